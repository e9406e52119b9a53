//! Quill headless demo host.
//!
//! Drives the toolkit without a rasterizer: it builds an editor-style
//! window (project list on the left, syntax-highlighted text box on the
//! right), replays a scripted editing session frame by frame, and logs the
//! draw commands each frame produces. Useful as an integration smoke test
//! and as a reference for embedding the toolkit in a real host.

use anyhow::Result;
use clap::Parser;
use quill_config::Config;
use quill_input::{Input, Keys};
use quill_render::{Background, Color, CursorShape, Font, Point, Rect};
use quill_ui::{
    ColorStyle, Context, Header, HeaderTitle, Layout, Length, List, Ordering, Style, TextBox,
    Widget, WidgetHandle, Window,
};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use unicode_width::UnicodeWidthChar;

const WINDOW_WIDTH: f32 = 1600.0;
const WINDOW_HEIGHT: f32 = 900.0;
const HEADER_HEIGHT: f32 = 25.0;
const TREE_WIDTH: f32 = 140.0;

const BACKGROUND: Color = Color::rgb(30, 28, 36);
const CHROME: Color = Color::rgb(232, 152, 168);

/// Scripted editing session replayed into the focused text box.
const SCRIPT: &str = "fn main() {\n\tlet answer = 42.5;\n\tprint(answer);\n}\n";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Quill UI toolkit demo host")]
struct Args {
    /// Optional file whose content seeds the editor before the script runs.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `quill.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Number of frames to drive.
    #[arg(long = "frames", default_value_t = 240)]
    pub frames: u32,
}

/// Cell-grid font metrics: every glyph advances by its terminal cell width.
/// Stands in for a real shaping stack in this rasterizer-less host.
#[derive(Debug)]
struct CellFont {
    cell_width: f32,
}

impl Font for CellFont {
    fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
        let width: f32 = text
            .chars()
            .map(|ch| self.glyph_advance(ch, size))
            .sum();
        (width, size)
    }

    fn glyph_advance(&self, ch: char, size: f32) -> f32 {
        let cells = ch.width().unwrap_or(0) as f32;
        cells * self.cell_width * (size / 12.0)
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = std::path::Path::new(".");
    let log_path = log_dir.join("quill.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "quill.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn build_ui(config: &Config, font: Rc<dyn Font>) -> Result<(Context, WidgetHandle)> {
    let colors = config.theme_colors()?;
    let text_size = config.file.editor.text_size;

    let mut ctx = Context::new(8);
    ctx.set_cursor_callback(|shape: CursorShape| {
        debug!(?shape, "cursor shape change requested");
    });

    let mut window = Window::new(
        Rect::new(0.0, 0.0, WINDOW_WIDTH, WINDOW_HEIGHT),
        Style {
            ordering: Ordering::Row,
            padding: 0.0,
            margin: Point::default(),
        },
    );
    window.background = Background::Solid(BACKGROUND);
    window.header = Some(Header {
        height: HEADER_HEIGHT,
        background: Background::Solid(CHROME),
        title: Some(HeaderTitle {
            text: "Quill".to_string(),
            font: Rc::clone(&font),
            size: text_size,
            color: colors.normal,
        }),
        close_button: None,
    });
    let win = ctx.add_window(window);

    let remaining = ctx.remaining_length(win).unwrap_or(0.0);
    let row = ctx
        .add_widget(
            win,
            Widget::Layout(Layout::new(
                Background::None,
                Style {
                    ordering: Ordering::Column,
                    padding: 0.0,
                    margin: Point::default(),
                },
            )),
            Length::Units(remaining - 20.0),
        )
        .expect("window root accepts a layout");

    let mut tree = List::new("project", Rc::clone(&font), text_size);
    tree.background = Background::Solid(CHROME.with_alpha(40));
    tree.style.padding = 3.0;
    tree.style.margin = Point::new(5.0, 0.0);
    tree.text_color = colors.normal;
    tree.push_item("src", 0);
    tree.push_item("main.qll", 1);
    tree.push_item("quill.toml", 0);
    ctx.add_widget(row, Widget::List(tree), Length::Units(TREE_WIDTH));

    let mut editor = TextBox::new(
        Rc::clone(&font),
        text_size,
        config.file.editor.capacity,
        config.file.editor.tab_size,
        config.file.editor.auto_indent,
    );
    editor.margin = 10.0;
    editor.line_padding = 2.0;
    editor.text_color = colors.normal;
    editor.has_ruler = true;
    editor.set_keywords(config.file.syntax.keywords.clone());
    editor.set_syntax_colors(ColorStyle {
        normal: colors.normal,
        keyword: colors.keyword,
        digit: colors.digit,
    });
    let editor = ctx
        .add_widget(row, Widget::TextBox(editor), Length::Fill)
        .expect("layout accepts the editor");

    Ok((ctx, editor))
}

/// Input snapshot for one scripted frame.
fn scripted_input(frame: u32, script: &mut std::str::Chars<'_>) -> Input {
    // Frame 0 clicks into the editor to focus it; afterwards the script
    // feeds one character per frame, using the key field for indentation
    // so the tab path is exercised too.
    if frame == 0 {
        return Input {
            mouse: Point::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0),
            mouse_left: true,
            ..Input::default()
        };
    }
    match script.next() {
        Some('\t') => Input {
            keys: Keys::TAB,
            ..Input::default()
        },
        Some(ch) => Input {
            typed: vec![ch],
            ..Input::default()
        },
        None => Input::default(),
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();

    let args = Args::parse();
    let config = quill_config::load_from(args.config.clone())?;
    info!(
        tab_size = config.file.editor.tab_size,
        auto_indent = config.file.editor.auto_indent,
        keywords = config.file.syntax.keywords.len(),
        "configuration loaded"
    );

    let font: Rc<dyn Font> = Rc::new(CellFont { cell_width: 8.0 });
    let (mut ctx, editor) = build_ui(&config, font)?;

    let seed = match args.path.as_ref() {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|err| {
            tracing::error!(path = %path.display(), %err, "seed file open failed");
            String::new()
        }),
        None => String::new(),
    };
    let script = format!("{seed}{SCRIPT}");
    let mut chars = script.chars();

    let mut total_entries = 0usize;
    for frame in 0..args.frames {
        ctx.update(scripted_input(frame, &mut chars));
        let entries = ctx.draw().count();
        total_entries += entries;
        debug!(frame, entries, "frame drained");
    }

    if let Some(Widget::TextBox(editor)) = ctx.widget(editor) {
        let buffer = editor.buffer();
        info!(
            lines = buffer.line_count(),
            chars = buffer.char_count(),
            "session complete"
        );
        println!(
            "{} frames, {} render entries, {} lines / {} chars in the editor",
            args.frames,
            total_entries,
            buffer.line_count(),
            buffer.char_count()
        );
        println!("--- editor content ---");
        println!("{}", buffer.text());
    }
    Ok(())
}
