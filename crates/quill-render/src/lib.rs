//! Render command primitives shared by the toolkit.
//!
//! Widgets never rasterize anything themselves. Each frame they append
//! [`RenderEntry`] values to a shared [`RenderBuffer`]; the host drains the
//! buffer exactly once per frame and hands the sequence to whatever
//! rasterizer it owns. Geometry is expressed in the same coordinate space
//! the host supplies with its input snapshots.
//!
//! Fonts and images are borrowed capabilities (see [`Font`] and [`Image`]):
//! the toolkit only ever asks for glyph advances and text extents.

use std::rc::Rc;

pub mod font;

pub use font::{Font, Image, MonoFont};

/// A point in host pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in host pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment check used for hover and click hit-tests.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Nine-slice border widths, in pixels of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn uniform(v: f32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }
}

/// Pointer shape requested by the toolkit while hovering interactive regions.
/// The host maps this to a platform cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    Text,
}

/// How a region is filled before its content draws.
#[derive(Debug, Clone, Default)]
pub enum Background {
    /// Nothing is emitted for the region.
    #[default]
    None,
    Solid(Color),
    /// Nine-slice stretched image fill.
    ImageSlice {
        image: Rc<dyn Image>,
        insets: Insets,
        color: Color,
    },
}

impl Background {
    /// Entry filling `rect`, or `None` for an invisible background.
    pub fn entry(&self, rect: Rect) -> Option<RenderEntry> {
        match self {
            Background::None => None,
            Background::Solid(color) => Some(RenderEntry::Rect {
                rect,
                color: *color,
            }),
            Background::ImageSlice {
                image,
                insets,
                color,
            } => Some(RenderEntry::ImageSlice {
                rect,
                color: *color,
                image: Rc::clone(image),
                insets: *insets,
            }),
        }
    }
}

/// One draw command. Resources referenced by an entry are borrowed for the
/// frame; nothing here owns a rasterizer-side allocation.
#[derive(Debug, Clone)]
pub enum RenderEntry {
    /// Draw `text` with its baseline box anchored at `rect`; `rect.height`
    /// carries the requested text size.
    Text {
        rect: Rect,
        color: Color,
        font: Rc<dyn Font>,
        text: String,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    /// Nine-slice image: corners keep their size, edges and center stretch.
    ImageSlice {
        rect: Rect,
        color: Color,
        image: Rc<dyn Image>,
        insets: Insets,
    },
}

/// Append-only per-frame command sequence.
#[derive(Debug, Default)]
pub struct RenderBuffer {
    entries: Vec<RenderEntry>,
}

impl RenderBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: RenderEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain the accumulated commands, resetting the buffer for the next
    /// frame while keeping its allocation. Call exactly once per drawn frame.
    pub fn flush(&mut self) -> std::vec::Drain<'_, RenderEntry> {
        self.entries.drain(..)
    }
}
