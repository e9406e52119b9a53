//! Per-frame input snapshots and derived edge/repeat state.
//!
//! The host polls its platform once per frame and pushes an [`Input`]
//! snapshot into the toolkit. Everything stateful — "just pressed" edges,
//! key-repeat cadence, the previous pointer position — is derived here from
//! consecutive snapshots, so hosts stay dumb and portable.

use bitflags::bitflags;
use quill_render::Point;

bitflags! {
    /// Named keys the toolkit reacts to, one bit per key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Keys: u16 {
        const ESC    = 1 << 0;
        const ENTER  = 1 << 1;
        /// Backspace on most hosts.
        const DELETE = 1 << 2;
        const CTRL   = 1 << 3;
        const SHIFT  = 1 << 4;
        const SPACE  = 1 << 5;
        const TAB    = 1 << 6;
        const UP     = 1 << 7;
        const DOWN   = 1 << 8;
        const LEFT   = 1 << 9;
        const RIGHT  = 1 << 10;
    }
}

/// Query handle for a single named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Esc = 0,
    Enter,
    Delete,
    Ctrl,
    Shift,
    Space,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

pub const KEY_COUNT: usize = 11;

impl Key {
    fn mask(self) -> Keys {
        Keys::from_bits_truncate(1 << self as u16)
    }
}

/// Raw snapshot the host pushes once per frame.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pub mouse: Point,
    pub mouse_left: bool,
    pub keys: Keys,
    /// Characters typed this frame, in arrival order.
    pub typed: Vec<char>,
}

/// Frames a key must stay held before auto-repeat starts.
pub const REPEAT_DELAY: u32 = 24;
/// Frames between repeats once auto-repeat is running.
pub const REPEAT_INTERVAL: u32 = 3;

/// Retained input state: previous vs. current snapshot plus per-key held
/// frame counters.
#[derive(Debug, Default)]
pub struct InputState {
    mouse: Point,
    prev_mouse: Point,
    left: bool,
    prev_left: bool,
    keys: Keys,
    prev_keys: Keys,
    counts: [u32; KEY_COUNT],
    typed: Vec<char>,
}

impl InputState {
    /// Rotate in the new snapshot and advance held counters. Counters
    /// increment while a key stays down and reset to zero on release.
    pub fn begin_frame(&mut self, input: Input) {
        self.prev_mouse = self.mouse;
        self.prev_left = self.left;
        self.prev_keys = self.keys;
        self.mouse = input.mouse;
        self.left = input.mouse_left;
        self.keys = input.keys;
        self.typed = input.typed;
        for i in 0..KEY_COUNT {
            let mask = Keys::from_bits_truncate(1 << i as u16);
            if self.keys.contains(mask) {
                self.counts[i] += 1;
            } else if self.prev_keys.contains(mask) {
                self.counts[i] = 0;
            }
        }
    }

    /// Drop frame-scoped data. The context calls this after the widget walk;
    /// hosts never clear the typed queue themselves.
    pub fn end_frame(&mut self) {
        self.typed.clear();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys.contains(key.mask())
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.keys.contains(key.mask()) && !self.prev_keys.contains(key.mask())
    }

    pub fn just_released(&self, key: Key) -> bool {
        !self.keys.contains(key.mask()) && self.prev_keys.contains(key.mask())
    }

    /// Consecutive frames the key has been held, zero when up.
    pub fn held_frames(&self, key: Key) -> u32 {
        self.counts[key as usize]
    }

    /// True on the first held frame, then every [`REPEAT_INTERVAL`] frames
    /// once [`REPEAT_DELAY`] frames have elapsed.
    pub fn is_repeated(&self, key: Key) -> bool {
        let held = self.counts[key as usize];
        held == 1 || (held >= REPEAT_DELAY && (held - REPEAT_DELAY) % REPEAT_INTERVAL == 0)
    }

    pub fn mouse_position(&self) -> Point {
        self.mouse
    }

    pub fn mouse_down(&self) -> bool {
        self.left
    }

    pub fn mouse_just_pressed(&self) -> bool {
        self.left && !self.prev_left
    }

    /// Characters typed this frame.
    pub fn typed(&self) -> &[char] {
        &self.typed
    }
}
