//! Borrowed font and image capabilities.
//!
//! The host owns glyph rasterization and atlases; the toolkit only measures.

use std::fmt;

/// Text measuring capability supplied by the host.
///
/// Implementations are shared as `Rc<dyn Font>` — the toolkit is
/// single-threaded by contract and never outlives the frame driver.
pub trait Font: fmt::Debug {
    /// Width and height of `text` rendered at `size`.
    fn measure_text(&self, text: &str, size: f32) -> (f32, f32);

    /// Horizontal advance of a single glyph at `size`.
    fn glyph_advance(&self, ch: char, size: f32) -> f32;
}

/// Host-side image referenced by nine-slice backgrounds.
pub trait Image: fmt::Debug {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
}

/// Fixed-advance metrics: every glyph is `advance` wide regardless of size.
///
/// Deterministic stand-in for tests and headless hosts; real hosts supply
/// metrics from their shaping stack.
#[derive(Debug, Clone, Copy)]
pub struct MonoFont {
    pub advance: f32,
}

impl MonoFont {
    pub const fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Font for MonoFont {
    fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
        (text.chars().count() as f32 * self.advance, size)
    }

    fn glyph_advance(&self, _ch: char, _size: f32) -> f32 {
        self.advance
    }
}
