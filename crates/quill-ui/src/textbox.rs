//! Plain-text code editing widget.
//!
//! The widget owns a [`TextBuffer`] and translates frame input into buffer
//! operations: typed characters insert, backspace deletes (an indent unit
//! at an indent stop), Enter splits the line, Tab indents, arrows navigate
//! with Ctrl switching to word motion. Drawing walks the cached per-line
//! tokens, so syntax coloring costs nothing beyond the edit-time relex.

use std::rc::Rc;

use quill_render::{
    Background, Color, CursorShape, Font, Point, Rect, RenderBuffer, RenderEntry,
};
use quill_text::{TextBuffer, TextMetrics, TokenKind};
use tracing::warn;

use crate::context::Frame;
use quill_input::Key;

/// Frames between cursor blink toggles.
const BLINK_FRAMES: u32 = 45;
/// Width of the line-number ruler strip.
const RULER_WIDTH: f32 = 40.0;
/// Alpha applied to ruler text and the divider line.
const RULER_ALPHA: u8 = 155;

/// Token colors used while syntax coloring is enabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorStyle {
    pub normal: Color,
    pub keyword: Color,
    pub digit: Color,
}

/// Editable text region with optional line-number ruler and syntax colors.
#[derive(Debug)]
pub struct TextBox {
    pub background: Background,
    pub margin: f32,
    pub line_padding: f32,
    pub text_color: Color,
    pub has_ruler: bool,
    font: Rc<dyn Font>,
    text_size: f32,
    colors: Option<ColorStyle>,
    buffer: TextBuffer,
    rect: Rect,
    active_rect: Rect,
    ruler_rect: Rect,
    focused: bool,
    show_cursor: bool,
    blink_timer: u32,
}

impl TextBox {
    pub fn new(
        font: Rc<dyn Font>,
        text_size: f32,
        capacity: usize,
        tab_size: usize,
        auto_indent: bool,
    ) -> Self {
        Self {
            background: Background::None,
            margin: 0.0,
            line_padding: 0.0,
            text_color: Color::WHITE,
            has_ruler: false,
            font,
            text_size,
            colors: None,
            buffer: TextBuffer::new(capacity, tab_size, auto_indent),
            rect: Rect::default(),
            active_rect: Rect::default(),
            ruler_rect: Rect::default(),
            focused: false,
            show_cursor: true,
            blink_timer: 0,
        }
    }

    /// Exact-match word list highlighted with the keyword color.
    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.buffer.set_keywords(keywords);
    }

    pub fn set_syntax_colors(&mut self, colors: ColorStyle) {
        self.colors = Some(colors);
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Carve the text and ruler regions out of the assigned rectangle and
    /// anchor the empty buffer at the text origin.
    pub(crate) fn init(&mut self) {
        self.active_rect = Rect::new(
            self.rect.x + self.margin,
            self.rect.y + self.margin,
            self.rect.width - self.margin * 2.0,
            self.rect.height - self.margin * 2.0,
        );
        if self.has_ruler {
            self.active_rect.x += self.margin + RULER_WIDTH;
            self.active_rect.width -= self.margin + RULER_WIDTH;
            self.ruler_rect = Rect::new(
                self.rect.x + self.margin,
                self.rect.y + self.margin,
                RULER_WIDTH,
                self.rect.height - self.margin * 2.0,
            );
        }
        let font = Rc::clone(&self.font);
        let m = self.metrics(font.as_ref());
        let origin = Point::new(self.active_rect.x, self.active_rect.y);
        self.buffer.reset(origin, &m);
    }

    fn metrics<'a>(&self, font: &'a dyn Font) -> TextMetrics<'a> {
        TextMetrics {
            font,
            size: self.text_size,
            line_padding: self.line_padding,
        }
    }

    pub(crate) fn update(&mut self, frame: &mut Frame<'_>) {
        let pos = frame.input.mouse_position();
        let hovered = self.active_rect.contains(pos);
        if hovered {
            frame.request_cursor_shape(CursorShape::Text);
        }
        if frame.input.mouse_just_pressed() {
            if hovered {
                self.focused = true;
                self.show_cursor = true;
                self.blink_timer = 0;
                let font = Rc::clone(&self.font);
                let m = self.metrics(font.as_ref());
                self.buffer.move_to_point(pos, &m);
            } else {
                self.focused = false;
            }
        }
        if !self.focused {
            return;
        }

        let font = Rc::clone(&self.font);
        let m = self.metrics(font.as_ref());
        for &ch in frame.input.typed() {
            let result = match ch {
                '\n' | '\r' => self.buffer.insert_line(&m),
                c if c.is_control() => Ok(()),
                c => self.buffer.insert_char(c, &m),
            };
            if let Err(err) = result {
                warn!(%err, "dropping typed input");
            }
        }
        if frame.input.is_repeated(Key::Delete) {
            if self.buffer.at_indent_stop() {
                self.buffer.delete_indent(&m);
            } else {
                self.buffer.delete_char(&m);
            }
        }
        if frame.input.is_repeated(Key::Enter)
            && let Err(err) = self.buffer.insert_line(&m)
        {
            warn!(%err, "dropping line break");
        }
        if frame.input.is_repeated(Key::Tab)
            && let Err(err) = self.buffer.insert_indent(&m)
        {
            warn!(%err, "dropping indent");
        }
        if frame.input.is_repeated(Key::Up) {
            self.buffer.move_up(&m);
        } else if frame.input.is_repeated(Key::Down) {
            self.buffer.move_down(&m);
        } else if frame.input.is_repeated(Key::Left) {
            if frame.input.is_down(Key::Ctrl) {
                self.buffer.move_to_prev_word(&m);
            } else {
                self.buffer.move_left(&m);
            }
        } else if frame.input.is_repeated(Key::Right) {
            if frame.input.is_down(Key::Ctrl) {
                self.buffer.move_to_next_word(&m);
            } else {
                self.buffer.move_right(&m);
            }
        }

        self.blink_timer += 1;
        if self.blink_timer == BLINK_FRAMES {
            self.blink_timer = 0;
            self.show_cursor = !self.show_cursor;
        }
    }

    fn token_color(&self, kind: TokenKind) -> Color {
        match self.colors {
            Some(colors) => match kind {
                TokenKind::Keyword => colors.keyword,
                TokenKind::Number => colors.digit,
                _ => colors.normal,
            },
            None => self.text_color,
        }
    }

    pub(crate) fn draw(&self, buf: &mut RenderBuffer) {
        if let Some(entry) = self.background.entry(self.rect) {
            buf.push(entry);
        }

        let lines = &self.buffer.lines()[..self.buffer.line_count()];
        for (i, line) in lines.iter().enumerate() {
            let mut x = 0.0;
            for token in &line.tokens {
                let text = self.buffer.slice(line.start + token.start, line.start + token.end);
                buf.push(RenderEntry::Text {
                    rect: Rect::new(line.origin.x + x, line.origin.y, 0.0, self.text_size),
                    color: self.token_color(token.kind),
                    font: Rc::clone(&self.font),
                    text,
                });
                x += token.width;
            }
            if self.has_ruler {
                let number = (i + 1).to_string();
                let (width, _) = self.font.measure_text(&number, self.text_size);
                buf.push(RenderEntry::Text {
                    rect: Rect::new(
                        self.ruler_rect.x + self.ruler_rect.width - width - self.margin,
                        self.ruler_rect.y + (self.text_size + self.line_padding) * i as f32,
                        0.0,
                        self.text_size,
                    ),
                    color: self.text_color.with_alpha(RULER_ALPHA),
                    font: Rc::clone(&self.font),
                    text: number,
                });
            }
        }
        if self.has_ruler {
            buf.push(RenderEntry::Rect {
                rect: Rect::new(
                    self.ruler_rect.x + RULER_WIDTH - 1.0,
                    self.ruler_rect.y,
                    1.0,
                    self.active_rect.height,
                ),
                color: self.text_color.with_alpha(RULER_ALPHA),
            });
        }
        if self.focused && self.show_cursor {
            buf.push(RenderEntry::Rect {
                rect: self.buffer.cursor_rect(),
                color: self.text_color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Frame;
    use quill_input::{Input, InputState, Keys};
    use quill_render::MonoFont;

    fn textbox() -> TextBox {
        let mut tb = TextBox::new(Rc::new(MonoFont::new(8.0)), 12.0, 128, 2, true);
        tb.margin = 10.0;
        tb.line_padding = 2.0;
        tb.set_rect(Rect::new(0.0, 0.0, 400.0, 300.0));
        tb.init();
        tb
    }

    fn run_frame(tb: &mut TextBox, state: &mut InputState, input: Input) -> CursorShape {
        let mut shape = CursorShape::Default;
        state.begin_frame(input);
        let mut frame = Frame::new(state, &mut shape);
        tb.update(&mut frame);
        state.end_frame();
        shape
    }

    fn click(tb: &mut TextBox, state: &mut InputState, x: f32, y: f32) -> CursorShape {
        run_frame(
            tb,
            state,
            Input {
                mouse: Point::new(x, y),
                mouse_left: true,
                ..Input::default()
            },
        )
    }

    #[test]
    fn click_focuses_and_hover_requests_text_cursor() {
        let mut tb = textbox();
        let mut state = InputState::default();
        assert!(!tb.is_focused());
        let shape = click(&mut tb, &mut state, 50.0, 50.0);
        assert!(tb.is_focused());
        assert_eq!(shape, CursorShape::Text);
    }

    #[test]
    fn click_outside_unfocuses() {
        let mut tb = textbox();
        let mut state = InputState::default();
        click(&mut tb, &mut state, 50.0, 50.0);
        // Release, then click outside the active rect.
        run_frame(&mut tb, &mut state, Input::default());
        let shape = click(&mut tb, &mut state, 395.0, 295.0);
        assert!(!tb.is_focused());
        assert_eq!(shape, CursorShape::Default);
    }

    #[test]
    fn typed_characters_reach_the_buffer() {
        let mut tb = textbox();
        let mut state = InputState::default();
        click(&mut tb, &mut state, 50.0, 50.0);
        run_frame(
            &mut tb,
            &mut state,
            Input {
                typed: vec!['h', 'i', '\n', 'o'],
                ..Input::default()
            },
        );
        assert_eq!(tb.buffer().text(), "hi\no");
        assert_eq!(tb.buffer().line_count(), 2);
    }

    #[test]
    fn unfocused_textbox_ignores_input() {
        let mut tb = textbox();
        let mut state = InputState::default();
        run_frame(
            &mut tb,
            &mut state,
            Input {
                typed: vec!['x'],
                ..Input::default()
            },
        );
        assert_eq!(tb.buffer().char_count(), 0);
    }

    #[test]
    fn backspace_at_indent_stop_removes_a_unit() {
        let mut tb = textbox();
        let mut state = InputState::default();
        click(&mut tb, &mut state, 50.0, 50.0);
        run_frame(
            &mut tb,
            &mut state,
            Input {
                keys: Keys::TAB,
                ..Input::default()
            },
        );
        assert_eq!(tb.buffer().text(), "  ");
        run_frame(&mut tb, &mut state, Input::default());
        run_frame(
            &mut tb,
            &mut state,
            Input {
                keys: Keys::DELETE,
                ..Input::default()
            },
        );
        assert_eq!(tb.buffer().text(), "");
    }

    #[test]
    fn draw_emits_cursor_only_while_focused() {
        let mut tb = textbox();
        let mut state = InputState::default();
        let mut buf = RenderBuffer::default();
        tb.draw(&mut buf);
        let unfocused = buf.flush().count();
        click(&mut tb, &mut state, 50.0, 50.0);
        tb.draw(&mut buf);
        let focused = buf.flush().count();
        assert_eq!(focused, unfocused + 1);
    }

    #[test]
    fn syntax_colors_split_keywords_from_identifiers() {
        let mut tb = textbox();
        tb.set_keywords(vec!["fn".to_string()]);
        tb.set_syntax_colors(ColorStyle {
            normal: Color::rgb(1, 1, 1),
            keyword: Color::rgb(2, 2, 2),
            digit: Color::rgb(3, 3, 3),
        });
        let mut state = InputState::default();
        click(&mut tb, &mut state, 50.0, 50.0);
        run_frame(
            &mut tb,
            &mut state,
            Input {
                typed: vec!['f', 'n', ' ', 'x', '4'],
                ..Input::default()
            },
        );
        let mut buf = RenderBuffer::default();
        tb.draw(&mut buf);
        let colors: Vec<Color> = buf
            .flush()
            .filter_map(|entry| match entry {
                RenderEntry::Text { color, text, .. } if !text.trim().is_empty() => Some(color),
                _ => None,
            })
            .collect();
        // "fn" keyword, "x" identifier, "4" number.
        assert_eq!(
            colors,
            vec![Color::rgb(2, 2, 2), Color::rgb(1, 1, 1), Color::rgb(3, 3, 3)]
        );
    }
}
