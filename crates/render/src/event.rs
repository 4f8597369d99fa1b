//! Input events
//!
//! Window input reported by a backend, in device coordinates.

use smallvec::SmallVec;

/// Names of the keys held down when a key event fired
pub type PressedKeys = SmallVec<[String; 4]>;

/// Input event types
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The window was closed
    Quit,
    /// Mouse button pressed at a device position
    MouseDown { x: i32, y: i32 },
    /// Key pressed
    KeyDown { key: String, pressed: PressedKeys },
    /// Key released
    KeyUp { key: String, pressed: PressedKeys },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>, pressed: &[&str]) -> Self {
        Self::KeyDown {
            key: key.into(),
            pressed: pressed.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn key_up(key: impl Into<String>, pressed: &[&str]) -> Self {
        Self::KeyUp {
            key: key.into(),
            pressed: pressed.iter().map(|k| k.to_string()).collect(),
        }
    }
}
