//! Window arena and per-frame driver.
//!
//! The context owns a fixed pool of window slots threaded through an
//! intrusive free list, and addresses live windows through generation
//! checked handles. A slot is either on the free list or occupied, never
//! both; every reuse bumps the slot generation, which is the only defense
//! against stale handles once slots recycle.

use quill_input::{Input, InputState};
use quill_render::{CursorShape, RenderBuffer, RenderEntry};
use tracing::{debug, warn};

use crate::layout::Length;
use crate::widget::Widget;
use crate::window::Window;

/// Render entries reserved per window slot.
const RENDER_ENTRIES_PER_WINDOW: usize = 10;

/// Reference to a window slot, valid while the stamped generation matches
/// the slot's live generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle {
    slot: u32,
    r#gen: u32,
}

/// Reference to a widget node inside a window. Validity rides on the
/// window handle's generation, so deleting the window invalidates every
/// widget handle into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetHandle {
    pub window: WindowHandle,
    index: u32,
}

/// Anything widgets can be inserted into: a window root or a layout node.
#[derive(Debug, Clone, Copy)]
pub enum ContainerHandle {
    Window(WindowHandle),
    Widget(WidgetHandle),
}

impl From<WindowHandle> for ContainerHandle {
    fn from(handle: WindowHandle) -> Self {
        ContainerHandle::Window(handle)
    }
}

impl From<WidgetHandle> for ContainerHandle {
    fn from(handle: WidgetHandle) -> Self {
        ContainerHandle::Widget(handle)
    }
}

#[derive(Debug)]
enum SlotState {
    Free { next: Option<u32> },
    Occupied(Window),
}

#[derive(Debug)]
struct Slot {
    r#gen: u32,
    state: SlotState,
}

/// Per-frame view handed to widgets during the update walk.
pub struct Frame<'a> {
    pub input: &'a InputState,
    cursor_shape: &'a mut CursorShape,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(input: &'a InputState, cursor_shape: &'a mut CursorShape) -> Self {
        Self {
            input,
            cursor_shape,
        }
    }

    /// Ask the host for a pointer shape. The shape resets to
    /// [`CursorShape::Default`] at the start of every frame, so widgets
    /// only ever escalate.
    pub fn request_cursor_shape(&mut self, shape: CursorShape) {
        *self.cursor_shape = shape;
    }
}

/// The toolkit root: window arena, retained input state, shared render
/// buffer. Passed explicitly everywhere; there is no ambient instance.
pub struct Context {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    active: Vec<u32>,
    input: InputState,
    render: RenderBuffer,
    cursor_shape: CursorShape,
    cursor_callback: Option<Box<dyn FnMut(CursorShape)>>,
}

impl Context {
    /// Build a context with room for `capacity` windows, all slots
    /// pre-linked into the free list at generation zero.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|i| Slot {
                r#gen: 0,
                state: SlotState::Free {
                    next: if i + 1 < capacity {
                        Some(i as u32 + 1)
                    } else {
                        None
                    },
                },
            })
            .collect();
        Self {
            slots,
            free_head: if capacity > 0 { Some(0) } else { None },
            active: Vec::with_capacity(capacity),
            input: InputState::default(),
            render: RenderBuffer::with_capacity(capacity * RENDER_ENTRIES_PER_WINDOW),
            cursor_shape: CursorShape::Default,
            cursor_callback: None,
        }
    }

    /// Host callback fired whenever the requested pointer shape changes.
    pub fn set_cursor_callback(&mut self, callback: impl FnMut(CursorShape) + 'static) {
        self.cursor_callback = Some(Box::new(callback));
    }

    /// Move `window` into a free slot and run its one-time init.
    ///
    /// # Panics
    ///
    /// Panics when every slot is occupied. The pool size is a static
    /// configuration choice, so exhaustion is a programming error rather
    /// than a runtime condition to recover from.
    pub fn add_window(&mut self, window: Window) -> WindowHandle {
        let Some(index) = self.free_head else {
            panic!(
                "ui context out of window slots (capacity {})",
                self.slots.len()
            );
        };
        let slot = &mut self.slots[index as usize];
        let SlotState::Free { next } = slot.state else {
            unreachable!("free list head points at an occupied slot");
        };
        self.free_head = next;
        slot.r#gen += 1;
        slot.state = SlotState::Occupied(window);
        if let SlotState::Occupied(win) = &mut slot.state {
            win.init();
        }
        self.active.push(index);
        debug!(slot = index, gen = slot.r#gen, "window added");
        WindowHandle {
            slot: index,
            r#gen: slot.r#gen,
        }
    }

    /// Reclaim the window's slot. A stale handle is logged and ignored:
    /// callers may legitimately hold handles past the window's deletion.
    pub fn delete_window(&mut self, handle: WindowHandle) {
        let Some(slot) = self.slots.get_mut(handle.slot as usize) else {
            warn!(slot = handle.slot, "delete_window: no such slot");
            return;
        };
        if slot.r#gen != handle.r#gen || matches!(slot.state, SlotState::Free { .. }) {
            warn!(slot = handle.slot, gen = handle.r#gen, "delete_window: stale handle");
            return;
        }
        slot.state = SlotState::Free {
            next: self.free_head,
        };
        self.free_head = Some(handle.slot);
        if let Some(pos) = self.active.iter().position(|&i| i == handle.slot) {
            self.active.swap_remove(pos);
        }
        debug!(slot = handle.slot, "window deleted");
    }

    /// Live window behind `handle`, if the handle is still current.
    pub fn window(&self, handle: WindowHandle) -> Option<&Window> {
        match self.slots.get(handle.slot as usize) {
            Some(slot) if slot.r#gen == handle.r#gen => match &slot.state {
                SlotState::Occupied(win) => Some(win),
                SlotState::Free { .. } => None,
            },
            _ => None,
        }
    }

    pub fn window_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        match self.slots.get_mut(handle.slot as usize) {
            Some(slot) if slot.r#gen == handle.r#gen => match &mut slot.state {
                SlotState::Occupied(win) => Some(win),
                SlotState::Free { .. } => None,
            },
            _ => None,
        }
    }

    /// Insert `widget` into a container (a window root or a layout node)
    /// and hand back a generation-checked handle to it. Invalid containers
    /// and stale handles are logged and yield `None`.
    pub fn add_widget(
        &mut self,
        container: impl Into<ContainerHandle>,
        widget: Widget,
        length: Length,
    ) -> Option<WidgetHandle> {
        let (window_handle, parent) = match container.into() {
            ContainerHandle::Window(h) => (h, None),
            ContainerHandle::Widget(h) => (h.window, Some(h.index)),
        };
        let Some(window) = self.window_mut(window_handle) else {
            warn!("add_widget: stale window handle");
            return None;
        };
        let index = window.add_widget(parent, widget, length)?;
        Some(WidgetHandle {
            window: window_handle,
            index,
        })
    }

    /// Register `widget` as a named tab on a tab viewer node.
    pub fn add_tab(
        &mut self,
        viewer: WidgetHandle,
        name: &str,
        widget: Widget,
    ) -> Option<WidgetHandle> {
        let Some(window) = self.window_mut(viewer.window) else {
            warn!("add_tab: stale window handle");
            return None;
        };
        let index = window.add_tab(viewer.index, name, widget)?;
        Some(WidgetHandle {
            window: viewer.window,
            index,
        })
    }

    /// Widget behind `handle`; `None` when the owning window is gone.
    pub fn widget(&self, handle: WidgetHandle) -> Option<&Widget> {
        self.window(handle.window)?.widget(handle.index)
    }

    pub fn widget_mut(&mut self, handle: WidgetHandle) -> Option<&mut Widget> {
        self.window_mut(handle.window)?.widget_mut(handle.index)
    }

    /// Unallocated primary-axis space left in `container`.
    pub fn remaining_length(&self, container: impl Into<ContainerHandle>) -> Option<f32> {
        match container.into() {
            ContainerHandle::Window(h) => self.window(h)?.remaining_length(None),
            ContainerHandle::Widget(h) => {
                self.window(h.window)?.remaining_length(Some(h.index))
            }
        }
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.active.len()
    }

    /// Advance one frame: fold the input snapshot into the retained state,
    /// walk every active window's update, then resolve the pointer shape.
    pub fn update(&mut self, input: Input) {
        self.input.begin_frame(input);
        let mut shape = CursorShape::Default;
        {
            let Context {
                slots,
                active,
                input,
                ..
            } = self;
            let mut frame = Frame::new(input, &mut shape);
            for &index in active.iter() {
                if let SlotState::Occupied(win) = &mut slots[index as usize].state {
                    win.update(&mut frame);
                }
            }
        }
        if shape != self.cursor_shape {
            self.cursor_shape = shape;
            if let Some(callback) = self.cursor_callback.as_mut() {
                callback(shape);
            }
        }
        self.input.end_frame();
    }

    /// Walk every active window's draw in update order and drain the
    /// resulting command sequence. Call exactly once per frame, after
    /// [`Context::update`].
    pub fn draw(&mut self) -> std::vec::Drain<'_, RenderEntry> {
        let Context {
            slots,
            active,
            render,
            ..
        } = self;
        for &index in active.iter() {
            if let SlotState::Occupied(win) = &slots[index as usize].state {
                win.draw(render);
            }
        }
        render.flush()
    }
}
