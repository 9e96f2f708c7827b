mod actions;
mod core;
mod mouse;
mod touch;

pub use core::{DispatchError, Dispatcher};
