//! End-to-end frame cycle: build a window tree, push input snapshots,
//! drain draw commands.

use std::rc::Rc;

use quill_input::{Input, Keys};
use quill_render::{Background, Color, MonoFont, Point, Rect, RenderEntry};
use quill_ui::{
    Context, Layout, Length, List, Ordering, Style, TextBox, Widget, Window,
};

fn style(ordering: Ordering) -> Style {
    Style {
        ordering,
        padding: 0.0,
        margin: Point::default(),
    }
}

fn demo_context() -> (Context, quill_ui::WidgetHandle) {
    let font = Rc::new(MonoFont::new(8.0));
    let mut ctx = Context::new(4);
    let mut window = Window::new(Rect::new(0.0, 0.0, 800.0, 600.0), style(Ordering::Row));
    window.background = Background::Solid(Color::rgb(30, 30, 30));
    let win = ctx.add_window(window);

    let row = ctx
        .add_widget(
            win,
            Widget::Layout(Layout::new(Background::None, style(Ordering::Column))),
            Length::Fill,
        )
        .unwrap();
    let mut list = List::new("project", Rc::clone(&font) as Rc<dyn quill_render::Font>, 12.0);
    list.push_item("main", 0);
    ctx.add_widget(row, Widget::List(list), Length::Units(140.0));

    let mut editor = TextBox::new(font, 12.0, 512, 2, true);
    editor.margin = 10.0;
    editor.line_padding = 2.0;
    let editor = ctx
        .add_widget(row, Widget::TextBox(editor), Length::Fill)
        .unwrap();
    (ctx, editor)
}

fn type_chars(ctx: &mut Context, chars: &str) {
    ctx.update(Input {
        typed: chars.chars().collect(),
        ..Input::default()
    });
}

#[test]
fn typed_input_lands_in_the_focused_editor() {
    let (mut ctx, editor) = demo_context();
    // Click inside the editor region to focus it. The list occupies
    // x in [0, 140), the editor the rest of the window.
    ctx.update(Input {
        mouse: Point::new(300.0, 100.0),
        mouse_left: true,
        ..Input::default()
    });
    type_chars(&mut ctx, "fn main");
    match ctx.widget(editor) {
        Some(Widget::TextBox(tb)) => {
            assert!(tb.is_focused());
            assert_eq!(tb.buffer().text(), "fn main");
        }
        other => panic!("unexpected widget: {other:?}"),
    }
}

#[test]
fn enter_key_splits_the_line() {
    let (mut ctx, editor) = demo_context();
    ctx.update(Input {
        mouse: Point::new(300.0, 100.0),
        mouse_left: true,
        ..Input::default()
    });
    type_chars(&mut ctx, "ab");
    ctx.update(Input {
        keys: Keys::ENTER,
        ..Input::default()
    });
    match ctx.widget(editor) {
        Some(Widget::TextBox(tb)) => {
            assert_eq!(tb.buffer().line_count(), 2);
            assert_eq!(tb.buffer().current_line(), 2);
        }
        other => panic!("unexpected widget: {other:?}"),
    }
}

#[test]
fn draw_starts_with_the_window_background_and_resets() {
    let (mut ctx, _) = demo_context();
    ctx.update(Input::default());
    let entries: Vec<RenderEntry> = ctx.draw().collect();
    assert!(!entries.is_empty());
    assert!(matches!(
        entries[0],
        RenderEntry::Rect { color, .. } if color == Color::rgb(30, 30, 30)
    ));
    // Text entries from the list heading and item labels are present.
    assert!(
        entries
            .iter()
            .any(|e| matches!(e, RenderEntry::Text { text, .. } if text == "project"))
    );
    ctx.update(Input::default());
    let second: Vec<RenderEntry> = ctx.draw().collect();
    assert_eq!(second.len(), entries.len());
}

#[test]
fn cursor_shape_callback_fires_on_hover_change() {
    use std::cell::RefCell;

    let shapes = Rc::new(RefCell::new(Vec::new()));
    let (mut ctx, _) = demo_context();
    let sink = Rc::clone(&shapes);
    ctx.set_cursor_callback(move |shape| sink.borrow_mut().push(shape));

    // Hover the editor, then move away.
    ctx.update(Input {
        mouse: Point::new(300.0, 100.0),
        ..Input::default()
    });
    ctx.update(Input {
        mouse: Point::new(300.0, 100.0),
        ..Input::default()
    });
    ctx.update(Input {
        mouse: Point::new(50.0, 100.0),
        ..Input::default()
    });
    use quill_render::CursorShape;
    assert_eq!(
        *shapes.borrow(),
        vec![CursorShape::Text, CursorShape::Default]
    );
}
