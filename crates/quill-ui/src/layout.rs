//! One-shot axis layout.
//!
//! A container hands out rectangles along a single primary axis, in
//! insertion order, and never moves a child afterwards. There is no reflow:
//! geometry assigned at insertion is final for the widget's lifetime.

use quill_render::{Point, Rect};

/// Which axis a container stacks its children along.
///
/// `Row` stacks downward (children are horizontal strips), `Column` stacks
/// rightward (children are vertical strips).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    Row,
    Column,
}

/// Container spacing configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub ordering: Ordering,
    /// Gap between consecutive children along the primary axis.
    pub padding: f32,
    /// Inset from the container edges, per axis.
    pub margin: Point,
}

/// Primary-axis extent requested for a child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Units(f32),
    /// Consume whatever axis space the container has left.
    Fill,
}

/// Allocation cursor for one container.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisLayout {
    pub style: Style,
    offset: f32,
}

impl AxisLayout {
    pub fn new(style: Style) -> Self {
        Self { style, offset: 0.0 }
    }

    /// Carve the next child rectangle out of `container`. The child spans
    /// the full cross axis (inside the margin) and `length` units along the
    /// primary axis; the cursor then advances past it plus padding.
    pub fn allocate(&mut self, container: Rect, length: Length) -> Rect {
        let len = match length {
            Length::Units(units) => units,
            Length::Fill => self.remaining(container),
        };
        let Style { margin, .. } = self.style;
        let rect = match self.style.ordering {
            Ordering::Row => Rect::new(
                container.x + margin.x,
                container.y + margin.y + self.offset,
                container.width - margin.x * 2.0,
                len,
            ),
            Ordering::Column => Rect::new(
                container.x + margin.x + self.offset,
                container.y + margin.y,
                len,
                container.height - margin.y * 2.0,
            ),
        };
        self.offset += len + self.style.padding;
        rect
    }

    /// Axis space not yet handed out, letting a caller size a final child
    /// to exactly fill the container.
    pub fn remaining(&self, container: Rect) -> f32 {
        let extent = match self.style.ordering {
            Ordering::Row => container.height - self.style.margin.y * 2.0,
            Ordering::Column => container.width - self.style.margin.x * 2.0,
        };
        extent - self.offset
    }
}
