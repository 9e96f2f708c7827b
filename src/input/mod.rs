//! Input classification and routing.
//!
//! This module turns host pointer, touch, keyboard and map life-cycle events
//! into mode callbacks. Gesture classification (click/tap vs drag) and feature
//! lookup live here alongside the [`Dispatcher`] that ties them to the active mode.

pub mod events;
pub mod gesture;
pub mod locate;
pub mod modifiers;
pub mod state;

pub use events::{DataEvent, EventKind, EventOutcome, InputEvent, Key, KeyEvent, PointerEvent, ZoomEvent};
pub use gesture::{GestureThresholds, PointSnapshot, is_click, is_tap};
pub use modifiers::Modifiers;
pub use state::{DispatchError, Dispatcher};
