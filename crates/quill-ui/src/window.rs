//! Top-level window node.
//!
//! A window owns a flat arena of widgets plus the root axis layout over
//! its content area. Its identity (arena slot) is fixed at creation; the
//! context recycles the slot only after an explicit delete.

use std::rc::Rc;

use quill_render::{Background, Color, Font, Point, Rect, RenderBuffer, RenderEntry};
use tracing::warn;

use crate::context::Frame;
use crate::layout::{AxisLayout, Length, Style};
use crate::widget::Widget;

/// Frame drawn along the window edges, over the widgets.
#[derive(Debug, Clone, Copy)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

/// Centered header caption.
#[derive(Debug)]
pub struct HeaderTitle {
    pub text: String,
    pub font: Rc<dyn Font>,
    pub size: f32,
    pub color: Color,
}

/// Header strip at the top of a window. The close button can only exist
/// on a window that has a header, by construction.
#[derive(Debug, Default)]
pub struct Header {
    pub height: f32,
    pub background: Background,
    pub title: Option<HeaderTitle>,
    pub close_button: Option<Background>,
}

/// A top-level UI node: styling, an optional header, and a widget arena.
#[derive(Debug)]
pub struct Window {
    pub rect: Rect,
    pub style: Style,
    pub background: Background,
    pub border: Option<Border>,
    pub header: Option<Header>,
    active_rect: Rect,
    header_rect: Rect,
    title_pos: Point,
    close_rect: Rect,
    layout: AxisLayout,
    nodes: Vec<Widget>,
    roots: Vec<u32>,
}

impl Window {
    pub fn new(rect: Rect, style: Style) -> Self {
        Self {
            rect,
            style,
            background: Background::None,
            border: None,
            header: None,
            active_rect: rect,
            header_rect: Rect::default(),
            title_pos: Point::default(),
            close_rect: Rect::default(),
            layout: AxisLayout::new(style),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// One-time geometry precomputation, run by the context when the
    /// window lands in its slot.
    pub(crate) fn init(&mut self) {
        self.layout = AxisLayout::new(self.style);
        match &self.header {
            Some(header) => {
                self.header_rect =
                    Rect::new(self.rect.x, self.rect.y, self.rect.width, header.height);
                self.active_rect = Rect::new(
                    self.rect.x,
                    self.rect.y + header.height,
                    self.rect.width,
                    self.rect.height - header.height,
                );
                if header.close_button.is_some() {
                    let side = header.height - self.style.margin.y * 2.0;
                    self.close_rect = Rect::new(
                        self.rect.x + self.rect.width - side - self.style.margin.x,
                        self.rect.y + self.style.margin.y,
                        side,
                        side,
                    );
                }
                if let Some(title) = &header.title {
                    let (width, height) = title.font.measure_text(&title.text, title.size);
                    self.title_pos = Point::new(
                        self.header_rect.x + (self.header_rect.width / 2.0 - width / 2.0),
                        self.header_rect.y + (self.header_rect.height / 2.0 - height / 2.0),
                    );
                }
            }
            None => self.active_rect = self.rect,
        }
    }

    /// Content area under the header.
    pub fn active_rect(&self) -> Rect {
        self.active_rect
    }

    /// Insert `widget` into `container` (the window root when `None`, a
    /// layout node index otherwise) and assign its one-shot rectangle.
    /// Returns the new node's index, or `None` for an invalid container.
    pub(crate) fn add_widget(
        &mut self,
        container: Option<u32>,
        mut widget: Widget,
        length: Length,
    ) -> Option<u32> {
        let index = self.nodes.len() as u32;
        let rect = match container {
            None => self.layout.allocate(self.active_rect, length),
            Some(parent) => match self.nodes.get_mut(parent as usize) {
                Some(Widget::Layout(layout)) => layout.allocate(length),
                Some(_) => {
                    warn!(parent, "add_widget target is not a container");
                    return None;
                }
                None => {
                    warn!(parent, "add_widget target does not exist");
                    return None;
                }
            },
        };
        widget.set_rect(rect);
        widget.init();
        self.nodes.push(widget);
        match container {
            None => self.roots.push(index),
            Some(parent) => {
                if let Some(Widget::Layout(layout)) = self.nodes.get_mut(parent as usize) {
                    layout.children.push(index);
                }
            }
        }
        Some(index)
    }

    /// Register `widget` as a new tab of the viewer at `viewer`. The tab
    /// widget fills the viewer's content rect rather than consuming axis
    /// space.
    pub(crate) fn add_tab(
        &mut self,
        viewer: u32,
        name: &str,
        mut widget: Widget,
    ) -> Option<u32> {
        let content = match self.nodes.get(viewer as usize) {
            Some(Widget::TabViewer(v)) => v.content_rect(),
            Some(_) => {
                warn!(viewer, "add_tab target is not a tab viewer");
                return None;
            }
            None => {
                warn!(viewer, "add_tab target does not exist");
                return None;
            }
        };
        let index = self.nodes.len() as u32;
        widget.set_rect(content);
        widget.init();
        self.nodes.push(widget);
        if let Some(Widget::TabViewer(v)) = self.nodes.get_mut(viewer as usize) {
            v.register_tab(name, index);
        }
        Some(index)
    }

    /// Axis space left in `container` (window root when `None`).
    pub(crate) fn remaining_length(&self, container: Option<u32>) -> Option<f32> {
        match container {
            None => Some(self.layout.remaining(self.active_rect)),
            Some(index) => match self.nodes.get(index as usize) {
                Some(Widget::Layout(layout)) => Some(layout.remaining()),
                _ => {
                    warn!(index, "remaining_length target is not a container");
                    None
                }
            },
        }
    }

    pub(crate) fn widget(&self, index: u32) -> Option<&Widget> {
        self.nodes.get(index as usize)
    }

    pub(crate) fn widget_mut(&mut self, index: u32) -> Option<&mut Widget> {
        self.nodes.get_mut(index as usize)
    }

    pub(crate) fn update(&mut self, frame: &mut Frame<'_>) {
        let roots = self.roots.clone();
        for index in roots {
            Self::update_node(&mut self.nodes, index, frame);
        }
    }

    fn update_node(nodes: &mut [Widget], index: u32, frame: &mut Frame<'_>) {
        let follow = match &mut nodes[index as usize] {
            Widget::Layout(layout) => layout.children.clone(),
            Widget::TabViewer(viewer) => viewer.update(frame).into_iter().collect(),
            Widget::List(list) => {
                list.update(frame);
                Vec::new()
            }
            Widget::TextBox(textbox) => {
                textbox.update(frame);
                Vec::new()
            }
        };
        for child in follow {
            Self::update_node(nodes, child, frame);
        }
    }

    pub(crate) fn draw(&self, buf: &mut RenderBuffer) {
        if let Some(entry) = self.background.entry(self.rect) {
            buf.push(entry);
        }
        if let Some(header) = &self.header {
            if let Some(entry) = header.background.entry(self.header_rect) {
                buf.push(entry);
            }
            if let Some(title) = &header.title {
                buf.push(RenderEntry::Text {
                    rect: Rect::new(self.title_pos.x, self.title_pos.y, 0.0, title.size),
                    color: title.color,
                    font: Rc::clone(&title.font),
                    text: title.text.clone(),
                });
            }
            if let Some(button) = &header.close_button
                && let Some(entry) = button.entry(self.close_rect)
            {
                buf.push(entry);
            }
        }
        for &root in &self.roots {
            Self::draw_node(&self.nodes, root, buf);
        }
        if let Some(border) = self.border {
            let Rect {
                x,
                y,
                width,
                height,
            } = self.rect;
            let sides = [
                Rect::new(x, y, border.width, height),
                Rect::new(x, y, width, border.width),
                Rect::new(x + width - border.width, y, border.width, height),
                Rect::new(x, y + height - border.width, width, border.width),
            ];
            for rect in sides {
                buf.push(RenderEntry::Rect {
                    rect,
                    color: border.color,
                });
            }
        }
    }

    fn draw_node(nodes: &[Widget], index: u32, buf: &mut RenderBuffer) {
        match &nodes[index as usize] {
            Widget::Layout(layout) => {
                layout.draw(buf);
                for &child in &layout.children {
                    Self::draw_node(nodes, child, buf);
                }
            }
            Widget::List(list) => list.draw(buf),
            Widget::TabViewer(viewer) => {
                if let Some(current) = viewer.draw(buf) {
                    Self::draw_node(nodes, current, buf);
                }
            }
            Widget::TextBox(textbox) => textbox.draw(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Ordering;
    use crate::widget::Layout;
    use quill_render::MonoFont;

    fn style(ordering: Ordering) -> Style {
        Style {
            ordering,
            padding: 0.0,
            margin: Point::default(),
        }
    }

    #[test]
    fn header_carves_the_active_rect() {
        let mut win = Window::new(Rect::new(0.0, 0.0, 800.0, 600.0), style(Ordering::Row));
        win.header = Some(Header {
            height: 25.0,
            ..Header::default()
        });
        win.init();
        assert_eq!(win.active_rect(), Rect::new(0.0, 25.0, 800.0, 575.0));
    }

    #[test]
    fn headerless_window_uses_its_full_rect() {
        let mut win = Window::new(Rect::new(0.0, 0.0, 800.0, 600.0), style(Ordering::Row));
        win.init();
        assert_eq!(win.active_rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn title_is_centered_in_the_header() {
        let mut win = Window::new(Rect::new(0.0, 0.0, 100.0, 50.0), style(Ordering::Row));
        win.header = Some(Header {
            height: 20.0,
            title: Some(HeaderTitle {
                text: "hi".to_string(),
                font: Rc::new(MonoFont::new(8.0)),
                size: 12.0,
                color: Color::WHITE,
            }),
            ..Header::default()
        });
        win.init();
        // Text is 16 wide, 12 tall: centered in the 100x20 header strip.
        assert_eq!(win.title_pos, Point::new(42.0, 4.0));
    }

    #[test]
    fn widgets_nest_under_layouts() {
        let mut win = Window::new(Rect::new(0.0, 0.0, 100.0, 100.0), style(Ordering::Row));
        win.init();
        let layout = win
            .add_widget(
                None,
                Widget::Layout(Layout::new(Background::None, style(Ordering::Column))),
                Length::Units(40.0),
            )
            .unwrap();
        let child = win
            .add_widget(
                Some(layout),
                Widget::Layout(Layout::new(Background::None, style(Ordering::Row))),
                Length::Units(25.0),
            )
            .unwrap();
        match win.widget(layout) {
            Some(Widget::Layout(l)) => assert_eq!(l.children, vec![child]),
            other => panic!("unexpected node: {other:?}"),
        }
        match win.widget(child) {
            Some(Widget::Layout(l)) => assert_eq!(l.rect, Rect::new(0.0, 0.0, 25.0, 40.0)),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn non_container_targets_are_rejected() {
        let font: Rc<dyn Font> = Rc::new(MonoFont::new(8.0));
        let mut win = Window::new(Rect::new(0.0, 0.0, 100.0, 100.0), style(Ordering::Row));
        win.init();
        let list = win
            .add_widget(
                None,
                Widget::List(crate::widget::List::new("root", font, 12.0)),
                Length::Units(40.0),
            )
            .unwrap();
        let rejected = win.add_widget(
            Some(list),
            Widget::Layout(Layout::new(Background::None, style(Ordering::Row))),
            Length::Units(10.0),
        );
        assert!(rejected.is_none());
        assert!(win.remaining_length(Some(list)).is_none());
    }

    #[test]
    fn draw_emits_background_then_border() {
        let mut win = Window::new(Rect::new(0.0, 0.0, 100.0, 100.0), style(Ordering::Row));
        win.background = Background::Solid(Color::rgb(1, 2, 3));
        win.border = Some(Border {
            width: 2.0,
            color: Color::WHITE,
        });
        win.init();
        let mut buf = RenderBuffer::default();
        win.draw(&mut buf);
        let entries: Vec<RenderEntry> = buf.flush().collect();
        assert_eq!(entries.len(), 5);
        assert!(matches!(
            entries[0],
            RenderEntry::Rect { color, .. } if color == Color::rgb(1, 2, 3)
        ));
    }
}
