//! Per-line tokenizer.
//!
//! Lexing is incremental at line granularity: an edit re-lexes only the
//! line it touched, and the resulting tokens (with pre-measured pixel
//! widths) are cached on the [`Line`](crate::Line) so drawing never scans
//! characters. Tokens partition the input exactly — every character lands
//! in precisely one token.

use crate::TextMetrics;

/// Classification of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Newline,
    Whitespace,
    Keyword,
    Identifier,
    Number,
    Symbol,
}

/// One lexed span, with offsets relative to the slice that was lexed and
/// the pixel width of the span cached from glyph advances.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// First character offset, inclusive.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Sum of glyph advances over the span.
    pub width: f32,
    pub kind: TokenKind,
}

struct Scanner<'a> {
    input: &'a [char],
    current: usize,
}

impl<'a> Scanner<'a> {
    fn eof(&self) -> bool {
        self.current >= self.input.len()
    }

    fn peek(&self) -> char {
        self.input[self.current]
    }

    fn advance(&mut self) -> char {
        let ch = self.input[self.current];
        self.current += 1;
        ch
    }
}

/// Tokenize `input`, replacing the contents of `tokens`.
///
/// Scan rules, in priority order at each position:
/// * `'\n'` becomes a single [`TokenKind::Newline`] token,
/// * a run of spaces becomes one [`TokenKind::Whitespace`] token,
/// * a digit starts a [`TokenKind::Number`]: digits plus at most one
///   interior `.` followed by a digit (a second dot ends the token),
/// * an ASCII letter starts a letter run, classified as
///   [`TokenKind::Keyword`] on an exact match against `keywords` and
///   [`TokenKind::Identifier`] otherwise,
/// * anything else is a single-character [`TokenKind::Symbol`].
pub fn lex_line(input: &[char], keywords: &[String], m: &TextMetrics<'_>, tokens: &mut Vec<Token>) {
    tokens.clear();
    let mut scanner = Scanner { input, current: 0 };
    while !scanner.eof() {
        let start = scanner.current;
        let ch = scanner.advance();
        let kind = match ch {
            '\n' => TokenKind::Newline,
            ' ' => {
                while !scanner.eof() && scanner.peek() == ' ' {
                    scanner.advance();
                }
                TokenKind::Whitespace
            }
            '0'..='9' => {
                let mut has_decimal = false;
                while !scanner.eof() {
                    let next = scanner.peek();
                    if next.is_ascii_digit() {
                        scanner.advance();
                    } else if next == '.' && !has_decimal && has_digit_after(&scanner) {
                        has_decimal = true;
                        scanner.advance();
                    } else {
                        break;
                    }
                }
                TokenKind::Number
            }
            _ if ch.is_ascii_alphabetic() => {
                while !scanner.eof() && scanner.peek().is_ascii_alphabetic() {
                    scanner.advance();
                }
                let word: String = input[start..scanner.current].iter().collect();
                if keywords.iter().any(|k| k == &word) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            _ => TokenKind::Symbol,
        };
        let end = scanner.current;
        let width = input[start..end].iter().map(|&c| m.advance(c)).sum();
        tokens.push(Token {
            start,
            end,
            width,
            kind,
        });
    }
}

/// Whether the character after the scanner's next one (the candidate dot)
/// is a digit, so `1.` lexes as a number then a symbol.
fn has_digit_after(scanner: &Scanner<'_>) -> bool {
    scanner
        .input
        .get(scanner.current + 1)
        .is_some_and(|c| c.is_ascii_digit())
}
