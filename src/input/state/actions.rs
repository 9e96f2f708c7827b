use log::{debug, trace};
use serde_json::Value;

use super::core::{DispatchError, Dispatcher};
use crate::config::{Action, KeyBinding};
use crate::host::{Host, ListenerTarget};
use crate::input::events::{DataEvent, EventKind, EventOutcome, InputEvent, KeyEvent, ZoomEvent};
use crate::mode::{KeyCallback, ModeOptions, SwitchOptions};

impl<H: Host> Dispatcher<H> {
    /// Routes one input event.
    ///
    /// Before [`start`](Self::start) events are still classified and map
    /// events still reach the host, but no mode callback runs.
    pub fn handle(&mut self, event: InputEvent) -> Result<EventOutcome, DispatchError> {
        trace!("handling {} event", event.kind());
        match event {
            InputEvent::MouseMove(e) => self.on_mouse_move(e),
            InputEvent::MouseDown(e) => self.on_mouse_down(e),
            InputEvent::MouseUp(e) => self.on_mouse_up(e),
            InputEvent::MouseOut(e) => self.on_mouse_out(e),
            InputEvent::TouchStart(e) => self.on_touch_start(e),
            InputEvent::TouchMove(e) => self.on_touch_move(e),
            InputEvent::TouchEnd(e) => self.on_touch_end(e),
            InputEvent::KeyDown(e) => self.on_key_down(e),
            InputEvent::KeyUp(e) => self.on_key_up(e),
            InputEvent::Data(e) => Ok(self.on_data(&e)),
            InputEvent::ZoomEnd(e) => Ok(self.on_zoom_end(e)),
        }
    }

    /// Invokes the handler registered under `name` with an untyped payload.
    ///
    /// Unknown names are ignored. A payload that does not fit the named event
    /// is an error.
    pub fn fire(&mut self, name: &str, payload: Value) -> Result<EventOutcome, DispatchError> {
        let Ok(kind) = name.parse::<EventKind>() else {
            debug!("Ignoring unknown event '{name}'");
            return Ok(EventOutcome::default());
        };

        let event = InputEvent::from_payload(kind, payload)
            .map_err(|source| DispatchError::InvalidPayload { event: kind, source })?;
        self.handle(event)
    }

    /// Subscribes the map events and the container events.
    ///
    /// Calling this twice without [`remove_event_listeners`](Self::remove_event_listeners)
    /// in between registers nothing new.
    pub fn add_event_listeners(&mut self) {
        if self.listening {
            return;
        }
        for kind in EventKind::MAP_EVENTS {
            self.host.on(ListenerTarget::Map, kind);
        }
        for kind in EventKind::CONTAINER_EVENTS {
            self.host.on(ListenerTarget::Container, kind);
        }
        self.listening = true;
    }

    /// Unsubscribes exactly what [`add_event_listeners`](Self::add_event_listeners) registered.
    pub fn remove_event_listeners(&mut self) {
        if !self.listening {
            return;
        }
        for kind in EventKind::MAP_EVENTS {
            self.host.off(ListenerTarget::Map, kind);
        }
        for kind in EventKind::CONTAINER_EVENTS {
            self.host.off(ListenerTarget::Container, kind);
        }
        self.listening = false;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Processes a key press.
    ///
    /// With keybindings enabled, a bound key runs its action instead of
    /// reaching the mode and the outcome asks the host to suppress the
    /// platform default.
    pub(super) fn on_key_down(&mut self, event: KeyEvent) -> Result<EventOutcome, DispatchError> {
        if let Some(action) = self.find_action(&event) {
            debug!("{:?} bound to {:?}", event.key, action);
            self.handle_action(action)?;
            return Ok(EventOutcome::prevent_default());
        }

        self.run_mode(|mode, ctx, _| mode.key(KeyCallback::KeyDown, ctx, &event))?;
        Ok(EventOutcome::default())
    }

    pub(super) fn on_key_up(&mut self, event: KeyEvent) -> Result<EventOutcome, DispatchError> {
        self.run_mode(|mode, ctx, _| mode.key(KeyCallback::KeyUp, ctx, &event))?;
        Ok(EventOutcome::default())
    }

    /// Re-adds the overlay layers after a style reload dropped any of them.
    pub(super) fn on_data(&mut self, event: &DataEvent) -> EventOutcome {
        if !event.is_style() {
            return EventOutcome::default();
        }

        let missing = self
            .overlay_layers
            .iter()
            .any(|layer| !self.host.has_layer(layer));
        if missing {
            debug!("Style reloaded without overlay layers; re-adding");
            self.host.add_layers();
            self.host.set_dirty();
            self.host.render();
        }
        EventOutcome::default()
    }

    pub(super) fn on_zoom_end(&mut self, event: ZoomEvent) -> EventOutcome {
        trace!("zoomend at {}", event.zoom);
        self.host.change_zoom(event.zoom);
        EventOutcome::default()
    }

    /// Look up the action bound to `event`, if keybindings are enabled.
    ///
    /// Bindings that switch to an unregistered mode are skipped so the key
    /// still reaches the active mode. Nothing is bound before `start`.
    fn find_action(&self, event: &KeyEvent) -> Option<Action> {
        self.current_mode_name()?;
        let action_map = self.action_map.as_ref()?;
        let binding = KeyBinding::for_event(event.key, event.modifiers)?;

        action_map
            .get(&binding)
            .filter(|action| match action {
                Action::ChangeMode(name) => self.registry().contains(name),
                _ => true,
            })
            .cloned()
    }

    fn handle_action(&mut self, action: Action) -> Result<(), DispatchError> {
        match action {
            Action::Trash => self.trash(&ModeOptions::Null),
            Action::CombineFeatures => self.combine_features(),
            Action::UncombineFeatures => self.uncombine_features(),
            Action::ChangeMode(name) => {
                self.change_mode(&name, ModeOptions::Null, SwitchOptions::default())
            }
        }
    }
}
