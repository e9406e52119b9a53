//! Widget variants and the closed widget sum.
//!
//! Widgets live in a flat per-window arena and reference each other by
//! index, so containers never hold pointers into the arena. Dispatch is a
//! plain match over [`Widget`]; there is no open trait object because the
//! variant set is fixed by the toolkit.

use std::rc::Rc;

use quill_render::{Background, Color, Font, Point, Rect, RenderBuffer, RenderEntry};

use crate::context::Frame;
use crate::layout::{AxisLayout, Length, Style};
use crate::textbox::TextBox;

/// Fixed width of one tab in a [`TabViewer`] header strip.
pub const TAB_WIDTH: f32 = 80.0;

/// Closed sum over every widget kind the toolkit composes.
#[derive(Debug)]
pub enum Widget {
    Layout(Layout),
    List(List),
    TabViewer(TabViewer),
    TextBox(TextBox),
}

impl Widget {
    pub(crate) fn set_rect(&mut self, rect: Rect) {
        match self {
            Widget::Layout(w) => w.rect = rect,
            Widget::List(w) => w.rect = rect,
            Widget::TabViewer(w) => w.rect = rect,
            Widget::TextBox(w) => w.set_rect(rect),
        }
    }

    /// One-time geometry precomputation, run right after the parent
    /// assigned the widget's rectangle.
    pub(crate) fn init(&mut self) {
        match self {
            Widget::Layout(w) => w.init(),
            Widget::List(_) => {}
            Widget::TabViewer(w) => w.init(),
            Widget::TextBox(w) => w.init(),
        }
    }
}

/// Invisible container stacking children along its own axis.
#[derive(Debug)]
pub struct Layout {
    pub background: Background,
    pub style: Style,
    pub(crate) rect: Rect,
    pub(crate) layout: AxisLayout,
    /// Child node indices into the owning window's widget arena.
    pub(crate) children: Vec<u32>,
}

impl Layout {
    pub fn new(background: Background, style: Style) -> Self {
        Self {
            background,
            style,
            rect: Rect::default(),
            layout: AxisLayout::new(style),
            children: Vec::new(),
        }
    }

    fn init(&mut self) {
        self.layout = AxisLayout::new(self.style);
    }

    pub(crate) fn allocate(&mut self, length: Length) -> Rect {
        self.layout.allocate(self.rect, length)
    }

    pub(crate) fn remaining(&self) -> f32 {
        self.layout.remaining(self.rect)
    }

    pub(crate) fn draw(&self, buf: &mut RenderBuffer) {
        if let Some(entry) = self.background.entry(self.rect) {
            buf.push(entry);
        }
    }
}

/// One row of a [`List`].
#[derive(Debug, Clone)]
pub struct ListItem {
    pub label: String,
    /// Nesting depth, rendered as a horizontal indent.
    pub depth: u32,
}

/// Flat item list with a heading row, indent levels and click-to-select.
#[derive(Debug)]
pub struct List {
    pub background: Background,
    pub style: Style,
    pub name: String,
    pub text_color: Color,
    pub highlight_color: Color,
    pub indent_size: f32,
    font: Rc<dyn Font>,
    text_size: f32,
    pub(crate) rect: Rect,
    items: Vec<ListItem>,
    selected: Option<usize>,
}

impl List {
    pub fn new(name: impl Into<String>, font: Rc<dyn Font>, text_size: f32) -> Self {
        Self {
            background: Background::None,
            style: Style::default(),
            name: name.into(),
            text_color: Color::WHITE,
            highlight_color: Color::rgba(255, 255, 255, 60),
            indent_size: 10.0,
            font,
            text_size,
            rect: Rect::default(),
            items: Vec::new(),
            selected: None,
        }
    }

    pub fn push_item(&mut self, label: impl Into<String>, depth: u32) {
        self.items.push(ListItem {
            label: label.into(),
            depth,
        });
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.map(|i| self.items[i].label.as_str())
    }

    fn row_height(&self) -> f32 {
        self.text_size + self.style.padding
    }

    /// Rectangle of row `row`, where row 0 is the heading and items start
    /// at row 1.
    fn row_rect(&self, row: usize) -> Rect {
        Rect::new(
            self.rect.x + self.style.margin.x,
            self.rect.y + self.style.margin.y + self.row_height() * row as f32,
            self.rect.width - self.style.margin.x * 2.0,
            self.row_height(),
        )
    }

    pub(crate) fn update(&mut self, frame: &mut Frame<'_>) {
        if !frame.input.mouse_just_pressed() {
            return;
        }
        let pos = frame.input.mouse_position();
        if !self.rect.contains(pos) {
            return;
        }
        let row = ((pos.y - self.rect.y - self.style.margin.y) / self.row_height()) as usize;
        // Row 0 is the heading, not selectable.
        if row >= 1 && row <= self.items.len() {
            self.selected = Some(row - 1);
        }
    }

    pub(crate) fn draw(&self, buf: &mut RenderBuffer) {
        if let Some(entry) = self.background.entry(self.rect) {
            buf.push(entry);
        }
        let heading = self.row_rect(0);
        buf.push(RenderEntry::Text {
            rect: Rect::new(heading.x, heading.y, 0.0, self.text_size),
            color: self.text_color,
            font: Rc::clone(&self.font),
            text: self.name.clone(),
        });
        for (i, item) in self.items.iter().enumerate() {
            let row = self.row_rect(i + 1);
            if self.selected == Some(i) {
                buf.push(RenderEntry::Rect {
                    rect: row,
                    color: self.highlight_color,
                });
            }
            buf.push(RenderEntry::Text {
                rect: Rect::new(
                    row.x + self.indent_size * item.depth as f32,
                    row.y,
                    0.0,
                    self.text_size,
                ),
                color: self.text_color,
                font: Rc::clone(&self.font),
                text: item.label.clone(),
            });
        }
    }
}

/// One registered tab: a fixed-width header cell plus the widget shown
/// while the tab is current.
#[derive(Debug)]
pub(crate) struct Tab {
    name: String,
    rect: Rect,
    pub(crate) widget: u32,
}

/// Tab strip over a shared content rectangle. Only the current tab's
/// widget updates and draws.
#[derive(Debug)]
pub struct TabViewer {
    pub header_background: Background,
    pub header_height: f32,
    pub tab_color: Color,
    pub text_color: Color,
    font: Rc<dyn Font>,
    text_size: f32,
    pub(crate) rect: Rect,
    header_rect: Rect,
    content_rect: Rect,
    pub(crate) tabs: Vec<Tab>,
    pub(crate) current: usize,
}

impl TabViewer {
    pub fn new(font: Rc<dyn Font>, text_size: f32, header_height: f32) -> Self {
        Self {
            header_background: Background::None,
            header_height,
            tab_color: Color::rgba(0, 0, 0, 60),
            text_color: Color::WHITE,
            font,
            text_size,
            rect: Rect::default(),
            header_rect: Rect::default(),
            content_rect: Rect::default(),
            tabs: Vec::new(),
            current: 0,
        }
    }

    fn init(&mut self) {
        self.header_rect = Rect::new(self.rect.x, self.rect.y, self.rect.width, self.header_height);
        self.content_rect = Rect::new(
            self.rect.x,
            self.rect.y + self.header_height,
            self.rect.width,
            self.rect.height - self.header_height,
        );
    }

    /// Rectangle every tab widget renders into.
    pub(crate) fn content_rect(&self) -> Rect {
        self.content_rect
    }

    /// Register `widget` (a node index in the owning window) under a new
    /// header cell. The new tab becomes current.
    pub(crate) fn register_tab(&mut self, name: impl Into<String>, widget: u32) {
        let rect = Rect::new(
            self.header_rect.x + TAB_WIDTH * self.tabs.len() as f32,
            self.header_rect.y,
            TAB_WIDTH,
            self.header_height,
        );
        self.tabs.push(Tab {
            name: name.into(),
            rect,
            widget,
        });
        self.current = self.tabs.len() - 1;
    }

    /// Handle header clicks, then report which widget (if any) should
    /// receive the rest of the frame.
    pub(crate) fn update(&mut self, frame: &mut Frame<'_>) -> Option<u32> {
        if frame.input.mouse_just_pressed() {
            let pos = frame.input.mouse_position();
            if self.header_rect.contains(pos) {
                for (i, tab) in self.tabs.iter().enumerate() {
                    if tab.rect.contains(pos) {
                        self.current = i;
                        break;
                    }
                }
            }
        }
        self.tabs.get(self.current).map(|tab| tab.widget)
    }

    /// Draw the header strip; the current tab's widget index is returned
    /// for the window to draw afterwards.
    pub(crate) fn draw(&self, buf: &mut RenderBuffer) -> Option<u32> {
        if let Some(entry) = self.header_background.entry(self.header_rect) {
            buf.push(entry);
        }
        for tab in &self.tabs {
            buf.push(RenderEntry::Rect {
                rect: tab.rect,
                color: self.tab_color,
            });
            let (text_width, text_height) = self.font.measure_text(&tab.name, self.text_size);
            buf.push(RenderEntry::Text {
                rect: Rect::new(
                    tab.rect.x + (tab.rect.width / 2.0 - text_width / 2.0),
                    tab.rect.y + (tab.rect.height / 2.0 - text_height / 2.0),
                    0.0,
                    self.text_size,
                ),
                color: self.text_color,
                font: Rc::clone(&self.font),
                text: tab.name.clone(),
            });
        }
        self.tabs.get(self.current).map(|tab| tab.widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_input::{Input, InputState, Keys};
    use quill_render::{CursorShape, MonoFont};

    fn frame_with_click<'a>(
        state: &'a mut InputState,
        shape: &'a mut CursorShape,
        x: f32,
        y: f32,
    ) -> Frame<'a> {
        state.begin_frame(Input {
            mouse: Point::new(x, y),
            mouse_left: true,
            keys: Keys::empty(),
            typed: Vec::new(),
        });
        Frame::new(state, shape)
    }

    #[test]
    fn list_click_selects_the_row_under_the_pointer() {
        let mut list = List::new("files", Rc::new(MonoFont::new(8.0)), 12.0);
        list.style.padding = 3.0;
        list.rect = Rect::new(0.0, 0.0, 100.0, 200.0);
        list.push_item("main", 0);
        list.push_item("util", 1);

        let mut state = InputState::default();
        let mut shape = CursorShape::Default;
        // Row height 15: heading occupies [0, 15), first item [15, 30).
        let mut frame = frame_with_click(&mut state, &mut shape, 10.0, 20.0);
        list.update(&mut frame);
        assert_eq!(list.selected(), Some(0));
        assert_eq!(list.selected_label(), Some("main"));
    }

    #[test]
    fn list_heading_row_is_not_selectable() {
        let mut list = List::new("files", Rc::new(MonoFont::new(8.0)), 12.0);
        list.rect = Rect::new(0.0, 0.0, 100.0, 200.0);
        list.push_item("main", 0);

        let mut state = InputState::default();
        let mut shape = CursorShape::Default;
        let mut frame = frame_with_click(&mut state, &mut shape, 10.0, 5.0);
        list.update(&mut frame);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn tab_click_switches_the_current_tab() {
        let mut viewer = TabViewer::new(Rc::new(MonoFont::new(8.0)), 12.0, 25.0);
        viewer.rect = Rect::new(0.0, 0.0, 400.0, 300.0);
        viewer.init();
        viewer.register_tab("one", 7);
        viewer.register_tab("two", 9);
        assert_eq!(viewer.current, 1);

        let mut state = InputState::default();
        let mut shape = CursorShape::Default;
        // First tab header spans x in [0, 80).
        let mut frame = frame_with_click(&mut state, &mut shape, 40.0, 10.0);
        assert_eq!(viewer.update(&mut frame), Some(7));
        assert_eq!(viewer.current, 0);
    }

    #[test]
    fn empty_tab_viewer_reports_no_widget() {
        let mut viewer = TabViewer::new(Rc::new(MonoFont::new(8.0)), 12.0, 25.0);
        viewer.rect = Rect::new(0.0, 0.0, 400.0, 300.0);
        viewer.init();
        let mut buf = RenderBuffer::default();
        assert_eq!(viewer.draw(&mut buf), None);
    }
}
