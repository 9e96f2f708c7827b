//! Keyboard modifier state carried with key events.

use serde::{Deserialize, Serialize};

/// Keyboard modifier state.
///
/// Tracks which modifier keys (Shift, Ctrl, Alt) were held when a key event
/// was produced. Used to match configured keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key pressed
    pub shift: bool,
    /// Ctrl key pressed
    pub ctrl: bool,
    /// Alt key pressed
    pub alt: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::new()
    }
}

impl Modifiers {
    /// Creates a new Modifiers instance with all keys released.
    pub fn new() -> Self {
        Self {
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    /// Returns true when no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}
