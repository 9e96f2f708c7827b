//! Interaction core for map feature editors.
//!
//! Classifies raw pointer, touch and keyboard input into gestures, resolves the
//! feature under the pointer, and routes the result to the active editing mode.
//! The host application supplies rendering, hit testing and persistence through
//! the traits in [`host`]; modes are registered by name in a [`mode::ModeRegistry`].

pub mod actionable;
pub mod config;
pub mod host;
pub mod input;
pub mod mode;
pub mod util;

pub use config::Config;
pub use input::{DispatchError, Dispatcher};
