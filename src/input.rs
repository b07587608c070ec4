//! Input contract between the host loop and the session.
//!
//! The session only ever sees an [`InputState`] snapshot of which actions
//! are currently held. The host builds snapshots with a [`KeyTracker`]
//! that records the frame number of the last press/repeat event for every
//! key and treats a key as held while it stays "fresh".
//!
//! This works on two classes of terminal:
//! * **Keyboard-enhancement capable** (kitty protocol): proper
//!   `Press` / `Repeat` / `Release` events — keys are removed on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated `Press`). Keys expire naturally after `HOLD_WINDOW` frames
//!   of silence, which is shorter than the OS repeat interval, so a key
//!   stays live while it is actively generating repeats.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind};

use crate::config::Bindings;

/// A key is considered "held" if its last press/repeat event arrived
/// within this many frames. The OS key-repeat rate is ≥ 15 Hz, so a
/// window of 4 frames (≈133 ms at 30 FPS) is always refreshed before
/// expiry on terminals without release events.
pub const HOLD_WINDOW: u64 = 4;

/// Which actions are held this frame. Axes are independent; both
/// directions of an axis can be held at once.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

/// Maps each held key to the frame it was last seen (press or repeat).
#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the frame counter; call once at the top of each host frame.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Feed one key event from the terminal.
    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    /// True if `key` was seen within the last [`HOLD_WINDOW`] frames.
    pub fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Snapshot the held state of the bound movement and fire keys.
    pub fn snapshot(&self, bindings: &Bindings) -> InputState {
        InputState {
            left: self.is_held(&bindings.left),
            right: self.is_held(&bindings.right),
            up: self.is_held(&bindings.up),
            down: self.is_held(&bindings.down),
            fire: self.is_held(&bindings.fire),
        }
    }
}
