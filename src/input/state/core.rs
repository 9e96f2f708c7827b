//! Dispatcher state, mode switching and capability tracking.

use std::collections::{HashMap, VecDeque};

use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

use crate::actionable::{ActionError, ActionPatch, ActionState};
use crate::config::{Action, Config, KeyBinding};
use crate::host::{Host, Notification};
use crate::input::EventKind;
use crate::input::gesture::{GestureThresholds, PointSnapshot};
use crate::mode::{
    ModeContext, ModeError, ModeHandler, ModeOptions, ModeRegistry, ModeRequest, SwitchOptions,
};

/// Upper bound on mode requests applied in response to a single call.
/// Guards against modes that keep switching to each other from `start`.
const MAX_CHAINED_REQUESTS: usize = 64;

/// Errors surfaced by the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Invalid keybinding configuration: {0}")]
    Keybindings(String),

    #[error("Invalid payload for '{event}' event: {source}")]
    InvalidPayload {
        event: EventKind,
        source: serde_json::Error,
    },
}

/// Routes input events to the active mode and owns all editor interaction state.
///
/// Exactly one mode is active between [`start`](Self::start) and drop. Every
/// mutating entry point takes `&mut self`, so handlers always run to
/// completion before the next event is processed.
#[derive(Debug)]
pub struct Dispatcher<H: Host> {
    pub(super) host: H,
    registry: ModeRegistry,
    pub(super) thresholds: GestureThresholds,
    pub(super) touch_enabled: bool,
    default_mode: String,
    pub(super) overlay_layers: Vec<String>,
    /// Present only when keybindings are enabled
    pub(super) action_map: Option<HashMap<KeyBinding, Action>>,
    current_mode_name: Option<String>,
    current_mode: Option<ModeHandler>,
    action_state: ActionState,
    /// Where the last mouse press started
    pub(super) mouse_down_info: Option<PointSnapshot>,
    /// Where the last touch started
    pub(super) touch_start_info: Option<PointSnapshot>,
    pub(super) listening: bool,
}

impl<H: Host> Dispatcher<H> {
    /// Creates a dispatcher. No mode is active until [`start`](Self::start).
    ///
    /// # Errors
    /// Fails when keybindings are enabled and the binding table is invalid.
    pub fn new(host: H, registry: ModeRegistry, config: &Config) -> Result<Self, DispatchError> {
        let action_map = if config.keybindings.enabled {
            let map = config
                .keybindings
                .build_action_map()
                .map_err(DispatchError::Keybindings)?;
            for action in map.values() {
                if let Action::ChangeMode(name) = action {
                    if !registry.contains(name) {
                        debug!("Keybinding targets unregistered mode '{name}'; it will be ignored");
                    }
                }
            }
            Some(map)
        } else {
            None
        };

        Ok(Self {
            host,
            registry,
            thresholds: GestureThresholds::from(&config.gestures),
            touch_enabled: config.interaction.touch_enabled,
            default_mode: config.interaction.default_mode.clone(),
            overlay_layers: config.style.overlay_layers.clone(),
            action_map,
            current_mode_name: None,
            current_mode: None,
            action_state: ActionState::default(),
            mouse_down_info: None,
            touch_start_info: None,
            listening: false,
        })
    }

    /// Enters the configured default mode.
    ///
    /// Unlike [`change_mode`](Self::change_mode) this neither stops a previous
    /// mode nor notifies or re-renders.
    pub fn start(&mut self) -> Result<(), DispatchError> {
        if self.current_mode.is_some() {
            warn!("Dispatcher already started; ignoring start()");
            return Ok(());
        }

        let name = self.default_mode.clone();
        let factory = self.registry.factory(&name)?;
        let mut ctx = ModeContext::new();
        let mode = factory(&Value::Null);
        self.current_mode = Some(ModeHandler::new(name.as_str(), mode, &mut ctx));
        info!("Started in mode '{name}'");
        self.current_mode_name = Some(name);

        self.apply_requests(ctx)
    }

    /// Stops the active mode and switches to `name`.
    ///
    /// An unknown `name` fails before the active mode is touched.
    pub fn change_mode(
        &mut self,
        name: &str,
        options: ModeOptions,
        switch: SwitchOptions,
    ) -> Result<(), DispatchError> {
        let ctx = self.switch_mode(name, &options, switch)?;
        self.apply_requests(ctx)
    }

    fn switch_mode(
        &mut self,
        name: &str,
        options: &ModeOptions,
        switch: SwitchOptions,
    ) -> Result<ModeContext, DispatchError> {
        let factory = self.registry.factory(name)?;
        let mut ctx = ModeContext::new();

        let previous = self.current_mode_name.take();
        if let Some(mut old) = self.current_mode.take() {
            old.stop(&mut ctx);
        }

        let mode = factory(options);
        self.current_mode = Some(ModeHandler::new(name, mode, &mut ctx));
        self.current_mode_name = Some(name.to_string());
        info!(
            "Switched from {:?} to '{}' mode",
            previous.as_deref().unwrap_or("<none>"),
            name
        );

        if !switch.silent {
            self.host.notify(Notification::ModeChange {
                mode: name.to_string(),
            });
        }
        self.host.set_dirty();
        self.host.render();

        Ok(ctx)
    }

    /// Updates capability flags, notifying the host if any flag flipped.
    ///
    /// The whole patch is validated first; an unknown flag name leaves every
    /// flag unchanged.
    pub fn actionable(&mut self, patch: &ActionPatch) -> Result<(), DispatchError> {
        if self.action_state.apply(patch)? {
            debug!("Actionable state changed: {:?}", self.action_state);
            self.host.notify(Notification::Actionable {
                actions: self.action_state,
            });
        }
        Ok(())
    }

    pub fn current_mode_name(&self) -> Option<&str> {
        self.current_mode_name.as_deref()
    }

    /// Same as [`current_mode_name`](Self::current_mode_name).
    pub fn get_mode(&self) -> Option<&str> {
        self.current_mode_name()
    }

    /// Lets the active mode decide how `feature` is displayed.
    pub fn current_mode_render(&self, feature: &Value, push: &mut dyn FnMut(Value)) {
        if let Some(mode) = &self.current_mode {
            mode.render(feature, push);
        }
    }

    pub fn trash(&mut self, options: &ModeOptions) -> Result<(), DispatchError> {
        self.run_mode(|mode, ctx, host| mode.trash(ctx, options, host))
    }

    pub fn combine_features(&mut self) -> Result<(), DispatchError> {
        self.run_mode(|mode, ctx, _| mode.combine_features(ctx))
    }

    pub fn uncombine_features(&mut self) -> Result<(), DispatchError> {
        self.run_mode(|mode, ctx, _| mode.uncombine_features(ctx))
    }

    pub fn action_state(&self) -> ActionState {
        self.action_state
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    pub fn touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Runs `f` against the active mode, then applies whatever it requested.
    ///
    /// Before [`start`](Self::start) there is no mode and the callback is skipped.
    pub(super) fn run_mode<F>(&mut self, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&mut ModeHandler, &mut ModeContext, &mut H),
    {
        let Some(mode) = self.current_mode.as_mut() else {
            debug!("Dispatcher not started; skipping mode callback");
            return Ok(());
        };

        let mut ctx = ModeContext::new();
        f(mode, &mut ctx, &mut self.host);
        self.apply_requests(ctx)
    }

    fn apply_requests(&mut self, mut ctx: ModeContext) -> Result<(), DispatchError> {
        let mut pending: VecDeque<ModeRequest> = ctx.take_requests().into();
        let mut applied = 0;

        while let Some(request) = pending.pop_front() {
            if applied == MAX_CHAINED_REQUESTS {
                warn!(
                    "Dropping {} mode requests after {} chained requests",
                    pending.len() + 1,
                    MAX_CHAINED_REQUESTS
                );
                break;
            }
            applied += 1;

            match request {
                ModeRequest::ChangeMode {
                    name,
                    options,
                    switch,
                } => {
                    let mut follow_up = self.switch_mode(&name, &options, switch)?;
                    pending.extend(follow_up.take_requests());
                }
                ModeRequest::Actionable(patch) => self.actionable(&patch)?,
            }
        }

        Ok(())
    }
}
