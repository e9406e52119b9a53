//! Property-based tests for TextBuffer line-table bookkeeping.

use proptest::prelude::*;
use quill_render::{MonoFont, Point};
use quill_text::{TextBuffer, TextMetrics, TokenKind};

const FONT: MonoFont = MonoFont::new(8.0);

fn metrics() -> TextMetrics<'static> {
    TextMetrics {
        font: &FONT,
        size: 12.0,
        line_padding: 2.0,
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(char),
    Newline,
    Delete,
    Indent,
    Dedent,
    Left,
    Right,
    Up,
    Down,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::char::range('a', 'z').prop_map(Op::Insert),
        2 => Just(Op::Insert(' ')),
        2 => Just(Op::Newline),
        3 => Just(Op::Delete),
        1 => Just(Op::Indent),
        1 => Just(Op::Dedent),
        1 => Just(Op::Left),
        1 => Just(Op::Right),
        1 => Just(Op::Up),
        1 => Just(Op::Down),
    ]
}

fn apply(buf: &mut TextBuffer, op: &Op, m: &TextMetrics<'_>) {
    match op {
        Op::Insert(ch) => {
            let _ = buf.insert_char(*ch, m);
        }
        Op::Newline => {
            let _ = buf.insert_line(m);
        }
        Op::Delete => buf.delete_char(m),
        Op::Indent => {
            let _ = buf.insert_indent(m);
        }
        Op::Dedent => buf.delete_indent(m),
        Op::Left => buf.move_left(m),
        Op::Right => buf.move_right(m),
        Op::Up => buf.move_up(m),
        Op::Down => buf.move_down(m),
    }
}

fn check_invariants(buf: &TextBuffer) -> Result<(), TestCaseError> {
    let lines = &buf.lines()[..buf.line_count()];
    prop_assert!(!lines.is_empty());
    prop_assert_eq!(lines[0].start, 0);
    prop_assert_eq!(lines[buf.line_count() - 1].end, buf.char_count());
    for pair in lines.windows(2) {
        prop_assert!(pair[0].start <= pair[0].end);
        // Exactly one separator character between adjacent lines.
        prop_assert_eq!(pair[0].end + 1, pair[1].start);
    }
    let current = &lines[buf.current_line() - 1];
    prop_assert!(buf.caret() >= current.start);
    prop_assert!(buf.caret() <= current.end);
    prop_assert!(buf.char_count() <= buf.capacity());
    for line in lines {
        let mut next = 0;
        for token in &line.tokens {
            prop_assert_eq!(token.start, next);
            prop_assert_ne!(token.kind, TokenKind::Newline);
            next = token.end;
        }
        prop_assert_eq!(next, line.len());
    }
    Ok(())
}

proptest! {
    // Any edit sequence keeps the line table a partition of the character
    // array with one separator between adjacent lines.
    #[test]
    fn edits_preserve_line_table(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let m = metrics();
        let mut buf = TextBuffer::new(256, 4, false);
        buf.reset(Point::default(), &m);
        for op in &ops {
            apply(&mut buf, op, &m);
            check_invariants(&buf)?;
        }
    }

    // Same, with auto-indent replay enabled on line breaks.
    #[test]
    fn auto_indent_preserves_line_table(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let m = metrics();
        let mut buf = TextBuffer::new(256, 4, true);
        buf.reset(Point::default(), &m);
        for op in &ops {
            apply(&mut buf, op, &m);
            check_invariants(&buf)?;
        }
    }

    // text() round-trips the logical content: line count matches separator
    // count and each line's text matches its slice.
    #[test]
    fn text_round_trips(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let m = metrics();
        let mut buf = TextBuffer::new(256, 4, false);
        buf.reset(Point::default(), &m);
        for op in &ops {
            apply(&mut buf, op, &m);
        }
        let text = buf.text();
        prop_assert_eq!(text.chars().filter(|&c| c == '\n').count(), buf.line_count() - 1);
        let rebuilt: Vec<String> = (0..buf.line_count())
            .map(|i| buf.line_text(i).unwrap())
            .collect();
        prop_assert_eq!(rebuilt.join("\n"), text);
    }
}
