//! Array-backed multi-line text editing engine.
//!
//! A [`TextBuffer`] owns one contiguous fixed-capacity character array
//! shared by every line. A [`Line`] does not own characters; it owns a
//! `[start, end)` offset range into the shared array, so mutating any line
//! shifts the offsets of every subsequent line by the same delta. That
//! bookkeeping is the central invariant every mutation here preserves:
//!
//! * `line[i].end + 1 == line[i + 1].start` (the separator position),
//! * `0 <= start <= end <= char_count <= capacity`,
//! * ranges strictly increase with line index,
//! * the caret stays inside the current line's `[start, end]`.
//!
//! The buffer also keeps a cached visual cursor rectangle and per-line
//! display origins in sync with every caret move, using glyph advances
//! from the borrowed [`TextMetrics`] collaborator. Line slots and token
//! vectors are recycled and only ever grow.

use quill_render::{Font, Point, Rect};
use thiserror::Error;

pub mod lexer;

pub use lexer::{Token, TokenKind, lex_line};

/// Width of the drawn caret rectangle, in pixels.
pub const TEXT_CURSOR_WIDTH: f32 = 2.0;

const INITIAL_LINE_CAPACITY: usize = 50;

/// Typed failure for text mutations. The capacity bound is a configuration
/// choice, so hitting it is a defined, reportable condition rather than a
/// corruption path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("text buffer full (capacity {capacity})")]
    BufferFull { capacity: usize },
}

/// Borrowed measuring collaborator passed into every operation that moves
/// the visual cursor or caches token widths.
pub struct TextMetrics<'a> {
    pub font: &'a dyn Font,
    pub size: f32,
    pub line_padding: f32,
}

impl TextMetrics<'_> {
    /// Horizontal advance of one glyph.
    pub fn advance(&self, ch: char) -> f32 {
        self.font.glyph_advance(ch, self.size)
    }

    /// Vertical distance between consecutive line origins.
    pub fn line_advance(&self) -> f32 {
        self.size + self.line_padding
    }
}

/// One display line: an offset range into the shared character array plus
/// cached lexing and layout state.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// First character offset, inclusive.
    pub start: usize,
    /// One past the last character; the line separator (if any) sits here.
    pub end: usize,
    /// Offset up to which the line is pure leading indentation.
    pub indent_end: usize,
    /// Tokens from the last lex of this line; offsets relative to `start`.
    pub tokens: Vec<Token>,
    /// Cached screen position of the line's first glyph.
    pub origin: Point,
}

impl Line {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Characters that terminate a word for word-wise caret motion.
fn is_word_terminal(ch: char) -> bool {
    matches!(ch, ' ' | '.' | '/' | '{' | '[' | '(')
}

/// The editing engine: shared character array, line table, caret.
#[derive(Debug)]
pub struct TextBuffer {
    chars: Vec<char>,
    char_count: usize,
    lines: Vec<Line>,
    line_count: usize,
    caret: usize,
    line_index: usize,
    current_indent: usize,
    tab_size: usize,
    auto_indent: bool,
    keywords: Vec<String>,
    origin: Point,
    cursor: Rect,
}

impl TextBuffer {
    pub fn new(capacity: usize, tab_size: usize, auto_indent: bool) -> Self {
        let mut lines = Vec::with_capacity(INITIAL_LINE_CAPACITY);
        lines.push(Line::default());
        Self {
            chars: vec!['\0'; capacity],
            char_count: 0,
            lines,
            line_count: 1,
            caret: 0,
            line_index: 0,
            current_indent: 0,
            tab_size,
            auto_indent,
            keywords: Vec::new(),
            origin: Point::default(),
            cursor: Rect::default(),
        }
    }

    /// Empty the buffer and anchor line 0 (and the caret) at `origin`.
    pub fn reset(&mut self, origin: Point, m: &TextMetrics<'_>) {
        self.char_count = 0;
        self.caret = 0;
        self.line_index = 0;
        self.current_indent = 0;
        self.line_count = 1;
        let line = &mut self.lines[0];
        line.start = 0;
        line.end = 0;
        line.indent_end = 0;
        line.origin = origin;
        line.tokens.clear();
        self.origin = origin;
        self.cursor = Rect::new(origin.x, origin.y, TEXT_CURSOR_WIDTH, m.size);
    }

    /// Keyword set used when classifying identifier runs.
    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.keywords = keywords;
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Insert one character at the caret. Shifts `[caret, char_count)` right,
    /// bumps the current line's end and every later line's offsets by one,
    /// advances the caret and cursor, and relexes the current line.
    ///
    /// Line separators never go through here; see [`TextBuffer::insert_line`].
    pub fn insert_char(&mut self, ch: char, m: &TextMetrics<'_>) -> Result<(), TextError> {
        debug_assert!(ch != '\n', "separators are inserted by insert_line");
        if self.char_count == self.chars.len() {
            return Err(TextError::BufferFull {
                capacity: self.chars.len(),
            });
        }
        self.chars
            .copy_within(self.caret..self.char_count, self.caret + 1);
        self.chars[self.caret] = ch;
        self.char_count += 1;
        self.lines[self.line_index].end += 1;
        for line in &mut self.lines[self.line_index + 1..self.line_count] {
            line.start += 1;
            line.end += 1;
        }
        self.cursor.x += m.advance(ch);
        self.caret += 1;
        self.relex_current(m);
        Ok(())
    }

    /// Insert every character of `text`, routing `'\n'` through
    /// [`TextBuffer::insert_line`].
    pub fn insert_str(&mut self, text: &str, m: &TextMetrics<'_>) -> Result<(), TextError> {
        for ch in text.chars() {
            if ch == '\n' {
                self.insert_line(m)?;
            } else {
                self.insert_char(ch, m)?;
            }
        }
        Ok(())
    }

    /// Backspace: delete the character before the caret. At a line start the
    /// deleted character is the separator, so the current line joins its
    /// predecessor instead (see [`TextBuffer::delete_line`]). No-op at
    /// offset zero.
    pub fn delete_char(&mut self, m: &TextMetrics<'_>) {
        if self.caret == 0 {
            return;
        }
        if self.caret == self.lines[self.line_index].start {
            self.delete_line(m);
            return;
        }
        let removed = self.chars[self.caret - 1];
        self.chars
            .copy_within(self.caret..self.char_count, self.caret - 1);
        for line in &mut self.lines[self.line_index + 1..self.line_count] {
            line.start -= 1;
            line.end -= 1;
        }
        self.lines[self.line_index].end -= 1;
        self.caret -= 1;
        self.char_count -= 1;
        self.cursor.x -= m.advance(removed);
        self.relex_current(m);
    }

    /// Enter: insert a separator at the caret and split the current line in
    /// two. The first half keeps `[start, caret)`; the new line takes
    /// `[caret + 1, old_end + 1)`. Later lines shift down one table slot
    /// (recycling a spare slot's token vector) and one line advance. With
    /// auto-indent enabled the current indent level is replayed as spaces
    /// on the new line before the caret settles.
    pub fn insert_line(&mut self, m: &TextMetrics<'_>) -> Result<(), TextError> {
        if self.char_count == self.chars.len() {
            return Err(TextError::BufferFull {
                capacity: self.chars.len(),
            });
        }
        // Separator insert: shifts characters and later offsets, but leaves
        // the caret and the current line's end for the split below.
        self.chars
            .copy_within(self.caret..self.char_count, self.caret + 1);
        self.chars[self.caret] = '\n';
        self.char_count += 1;
        for line in &mut self.lines[self.line_index + 1..self.line_count] {
            line.start += 1;
            line.end += 1;
        }

        let new_start = self.caret + 1;
        let new_end = self.lines[self.line_index].end + 1;
        self.lines[self.line_index].end = self.caret;
        self.relex_current(m);

        if self.lines.len() == self.line_count {
            self.lines.push(Line::default());
        }
        self.line_count += 1;
        self.lines[self.line_index + 1..self.line_count].rotate_right(1);
        let dy = m.line_advance();
        for line in &mut self.lines[self.line_index + 2..self.line_count] {
            line.origin.y += dy;
        }

        let origin = Point::new(
            self.lines[self.line_index].origin.x,
            self.lines[self.line_index].origin.y + dy,
        );
        self.line_index += 1;
        let line = &mut self.lines[self.line_index];
        line.start = new_start;
        line.end = new_end;
        line.indent_end = new_start;
        line.origin = origin;
        line.tokens.clear();
        self.move_to_line_start();

        if self.auto_indent {
            for _ in 0..self.current_indent {
                for _ in 0..self.tab_size {
                    self.insert_char(' ', m)?;
                    self.lines[self.line_index].indent_end += 1;
                }
            }
        }
        self.relex_current(m);
        Ok(())
    }

    /// Join the current line into the previous one by removing the separator
    /// between them and compacting the line table upward. The caret lands at
    /// the join point. Explicit no-op on the first line, which has no
    /// separator before it.
    pub fn delete_line(&mut self, m: &TextMetrics<'_>) {
        if self.line_index == 0 {
            return;
        }
        let start = self.lines[self.line_index].start;
        // The separator sits at start - 1; everything from start shifts left.
        self.chars.copy_within(start..self.char_count, start - 1);
        self.char_count -= 1;
        let joined_end = self.lines[self.line_index].end - 1;
        let new_caret = self.lines[self.line_index - 1].end;
        for line in &mut self.lines[self.line_index + 1..self.line_count] {
            line.start -= 1;
            line.end -= 1;
        }
        self.lines[self.line_index - 1].end = joined_end;
        // Rotate the dead slot past the live range so its allocation is
        // recycled by the next split.
        self.lines[self.line_index..self.line_count].rotate_left(1);
        self.line_count -= 1;
        let dy = m.line_advance();
        for line in &mut self.lines[self.line_index..self.line_count] {
            line.origin.y -= dy;
        }
        self.line_index -= 1;
        self.caret = new_caret;
        self.set_cursor_from_caret(m);
        self.relex_current(m);
    }

    /// Tab: insert one indent unit (`tab_size` spaces). The tracked indent
    /// level only grows when the caret sits exactly at the line's indent
    /// stop; elsewhere this is a plain multi-space insert.
    pub fn insert_indent(&mut self, m: &TextMetrics<'_>) -> Result<(), TextError> {
        if self.caret == self.lines[self.line_index].indent_end {
            self.current_indent += 1;
            self.lines[self.line_index].indent_end += self.tab_size;
        }
        for _ in 0..self.tab_size {
            self.insert_char(' ', m)?;
        }
        Ok(())
    }

    /// Remove one indent unit when the caret sits at the indent stop and the
    /// line has leading indentation; otherwise fall back to a single delete.
    pub fn delete_indent(&mut self, m: &TextMetrics<'_>) {
        let line = &self.lines[self.line_index];
        if line.start == line.indent_end {
            self.delete_char(m);
        } else {
            self.current_indent = self.current_indent.saturating_sub(1);
            let line = &mut self.lines[self.line_index];
            line.indent_end = line.indent_end.saturating_sub(self.tab_size);
            for _ in 0..self.tab_size {
                self.delete_char(m);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Caret navigation
    // ---------------------------------------------------------------------

    /// Move up one line, preserving the column where the target line is long
    /// enough, else clamping to its end. Stops silently at the first line.
    pub fn move_up(&mut self, m: &TextMetrics<'_>) {
        if self.line_index == 0 {
            return;
        }
        let col = self.caret - self.lines[self.line_index].start;
        self.line_index -= 1;
        self.settle_column(col, m);
    }

    /// Mirror of [`TextBuffer::move_up`].
    pub fn move_down(&mut self, m: &TextMetrics<'_>) {
        if self.line_index + 1 >= self.line_count {
            return;
        }
        let col = self.caret - self.lines[self.line_index].start;
        self.line_index += 1;
        self.settle_column(col, m);
    }

    fn settle_column(&mut self, col: usize, m: &TextMetrics<'_>) {
        let line = &self.lines[self.line_index];
        if line.start + col < line.end {
            self.caret = line.start + col;
            self.set_cursor_from_caret(m);
        } else {
            self.move_to_line_end(m);
        }
    }

    /// Move right one character, wrapping onto the next line's start at a
    /// line boundary. Stops silently at the end of the buffer.
    pub fn move_right(&mut self, m: &TextMetrics<'_>) {
        if self.caret + 1 > self.char_count {
            return;
        }
        if self.caret + 1 > self.lines[self.line_index].end {
            self.line_index += 1;
            self.move_to_line_start();
        } else {
            let ch = self.chars[self.caret];
            self.cursor.x += m.advance(ch);
            self.caret += 1;
        }
    }

    /// Move left one character, wrapping onto the previous line's end at a
    /// line boundary. Stops silently at offset zero.
    pub fn move_left(&mut self, m: &TextMetrics<'_>) {
        if self.caret == 0 {
            return;
        }
        if self.caret - 1 < self.lines[self.line_index].start {
            self.line_index -= 1;
            self.move_to_line_end(m);
        } else {
            let ch = self.chars[self.caret - 1];
            self.cursor.x -= m.advance(ch);
            self.caret -= 1;
        }
    }

    /// Word-wise forward motion: from a word character, skip to the end of
    /// the word and through any following run of spaces; from a terminal
    /// character, step over exactly one.
    pub fn move_to_next_word(&mut self, m: &TextMetrics<'_>) {
        if self.caret >= self.char_count {
            return;
        }
        if is_word_terminal(self.chars[self.caret]) {
            self.move_right(m);
            return;
        }
        while self.caret < self.char_count && !is_word_terminal(self.chars[self.caret]) {
            self.move_right(m);
        }
        while self.caret < self.char_count && self.chars[self.caret] == ' ' {
            self.move_right(m);
        }
    }

    /// Word-wise backward motion: step over a single terminal, else skip
    /// back through the word behind the caret.
    pub fn move_to_prev_word(&mut self, m: &TextMetrics<'_>) {
        if self.caret == 0 {
            return;
        }
        if is_word_terminal(self.chars[self.caret - 1]) {
            self.move_left(m);
            return;
        }
        while self.caret > 0 && !is_word_terminal(self.chars[self.caret - 1]) {
            self.move_left(m);
        }
    }

    /// Place the caret at the display position `p`: a linear scan over line
    /// bands followed by a glyph-advance scan across the matched line. A
    /// point below every band clamps to the end of the last line.
    pub fn move_to_point(&mut self, p: Point, m: &TextMetrics<'_>) {
        let band = m.line_advance();
        for i in 0..self.line_count {
            let top = self.lines[i].origin.y;
            if p.y < top || p.y > top + band {
                continue;
            }
            self.line_index = i;
            self.move_to_line_start();
            let (start, end) = (self.lines[i].start, self.lines[i].end);
            for j in start..end {
                let advance = m.advance(self.chars[j]);
                if p.x <= self.cursor.x + advance {
                    break;
                }
                self.caret = j + 1;
                self.cursor.x += advance;
            }
            return;
        }
        self.line_index = self.line_count - 1;
        self.move_to_line_end(m);
    }

    pub fn move_to_line_start(&mut self) {
        let line = &self.lines[self.line_index];
        self.caret = line.start;
        self.cursor.x = line.origin.x;
        self.cursor.y = line.origin.y;
    }

    pub fn move_to_line_end(&mut self, m: &TextMetrics<'_>) {
        self.caret = self.lines[self.line_index].end;
        self.set_cursor_from_caret(m);
    }

    /// Recompute the cursor rectangle from the caret by summing glyph
    /// advances from the line start.
    fn set_cursor_from_caret(&mut self, m: &TextMetrics<'_>) {
        let line = &self.lines[self.line_index];
        let mut x = line.origin.x;
        for &ch in &self.chars[line.start..self.caret] {
            x += m.advance(ch);
        }
        self.cursor.x = x;
        self.cursor.y = line.origin.y;
    }

    fn relex_current(&mut self, m: &TextMetrics<'_>) {
        let line = &mut self.lines[self.line_index];
        let (start, end) = (line.start, line.end);
        lex_line(&self.chars[start..end], &self.keywords, m, &mut line.tokens);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// True when the caret sits exactly at the current line's indent stop,
    /// where backspace removes a whole indent unit.
    pub fn at_indent_stop(&self) -> bool {
        self.caret == self.lines[self.line_index].indent_end
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// 1-based line number of the caret, for status display.
    pub fn current_line(&self) -> usize {
        self.line_index + 1
    }

    /// Column offset of the caret from the current line's start.
    pub fn current_column(&self) -> usize {
        self.caret - self.lines[self.line_index].start
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn capacity(&self) -> usize {
        self.chars.len()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Live lines, in display order.
    pub fn lines(&self) -> &[Line] {
        &self.lines[..self.line_count]
    }

    /// Owned copy of the characters in `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Text of line `index`, without its separator.
    pub fn line_text(&self, index: usize) -> Option<String> {
        let line = self.lines.get(index).filter(|_| index < self.line_count)?;
        Some(self.slice(line.start, line.end))
    }

    /// The whole buffer content, separators included.
    pub fn text(&self) -> String {
        self.slice(0, self.char_count)
    }

    /// Cached visual cursor rectangle, kept in sync with every caret move.
    pub fn cursor_rect(&self) -> Rect {
        self.cursor
    }
}
