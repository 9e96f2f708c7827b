//! Drawing modes and their lifecycle.
//!
//! A mode owns the semantics of one editing interaction (selecting, drawing a
//! polygon, ...). The dispatcher keeps exactly one mode active and forwards
//! every classified gesture to it. Modes implement [`Mode`], overriding only
//! the callbacks they care about; everything else is a no-op.
//!
//! Modes never call back into the dispatcher. Mode switches and capability
//! updates are queued on the [`ModeContext`] and applied by the dispatcher
//! once the running callback has returned.

pub mod builtin;
mod handler;
mod registry;

pub use handler::{KeyCallback, ModeHandler, PointerCallback};
pub use registry::{ModeFactory, ModeRegistry};

use serde_json::Value;
use thiserror::Error;

use crate::actionable::ActionPatch;
use crate::host::FeatureDescriptor;
use crate::input::{KeyEvent, PointerEvent};

/// Opaque, mode-specific construction options.
pub type ModeOptions = Value;

/// Errors raised by mode registration and lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("{0} is not a valid mode")]
    UnknownMode(String),

    #[error("Mode name must not be empty")]
    EmptyName,

    #[error("Mode '{0}' is already registered")]
    DuplicateMode(String),
}

/// Options controlling a single mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchOptions {
    /// Skip the mode-change notification
    pub silent: bool,
}

impl SwitchOptions {
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// A pointer event together with the feature resolved under it.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub input: PointerEvent,
    pub feature_target: Option<FeatureDescriptor>,
}

impl GestureEvent {
    pub fn new(input: PointerEvent, feature_target: Option<FeatureDescriptor>) -> Self {
        Self {
            input,
            feature_target,
        }
    }

    /// An event with no feature resolution (mouseout, drag).
    pub fn untargeted(input: PointerEvent) -> Self {
        Self::new(input, None)
    }
}

/// Work a mode asks the dispatcher to do after its callback returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeRequest {
    ChangeMode {
        name: String,
        options: ModeOptions,
        switch: SwitchOptions,
    },
    Actionable(ActionPatch),
}

/// Handle passed to every mode callback.
#[derive(Debug, Default)]
pub struct ModeContext {
    requests: Vec<ModeRequest>,
}

impl ModeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a switch to `name` once the current callback returns.
    pub fn change_mode(&mut self, name: impl Into<String>, options: ModeOptions) {
        self.change_mode_with(name, options, SwitchOptions::default());
    }

    pub fn change_mode_with(
        &mut self,
        name: impl Into<String>,
        options: ModeOptions,
        switch: SwitchOptions,
    ) {
        self.requests.push(ModeRequest::ChangeMode {
            name: name.into(),
            options,
            switch,
        });
    }

    /// Requests a capability flag update.
    pub fn actionable(&mut self, patch: ActionPatch) {
        self.requests.push(ModeRequest::Actionable(patch));
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    pub(crate) fn take_requests(&mut self) -> Vec<ModeRequest> {
        std::mem::take(&mut self.requests)
    }
}

/// One editing mode. Every callback defaults to a no-op.
pub trait Mode {
    /// Runs once when the mode becomes active.
    fn start(&mut self, _ctx: &mut ModeContext) {}

    /// Runs once when the mode is replaced.
    fn stop(&mut self, _ctx: &mut ModeContext) {}

    /// Decides how `feature` (a GeoJSON feature) appears in the overlay.
    /// Call `push` zero or more times with display features.
    fn render(&self, feature: &Value, push: &mut dyn FnMut(Value)) {
        push(feature.clone());
    }

    fn mousedown(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn mouseup(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn mousemove(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn mouseout(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn drag(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn click(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn touchstart(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn touchmove(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn touchend(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn tap(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {}
    fn keydown(&mut self, _ctx: &mut ModeContext, _event: &KeyEvent) {}
    fn keyup(&mut self, _ctx: &mut ModeContext, _event: &KeyEvent) {}
    fn trash(&mut self, _ctx: &mut ModeContext, _options: &ModeOptions) {}
    fn combine_features(&mut self, _ctx: &mut ModeContext) {}
    fn uncombine_features(&mut self, _ctx: &mut ModeContext) {}
}
