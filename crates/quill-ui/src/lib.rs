//! Retained-mode widget toolkit.
//!
//! A [`Context`] owns a fixed arena of window slots addressed by
//! generation-checked handles. Windows compose widgets — layouts, lists,
//! tab viewers and text boxes — placed once by a one-shot axis layout.
//! Each frame the host pushes an input snapshot through
//! [`Context::update`], then drains draw commands from [`Context::draw`]
//! and hands them to its own rasterizer.

pub mod context;
pub mod layout;
pub mod textbox;
pub mod widget;
pub mod window;

pub use context::{ContainerHandle, Context, Frame, WidgetHandle, WindowHandle};
pub use layout::{AxisLayout, Length, Ordering, Style};
pub use textbox::{ColorStyle, TextBox};
pub use widget::{Layout, List, ListItem, TabViewer, Widget, TAB_WIDTH};
pub use window::{Border, Header, HeaderTitle, Window};
