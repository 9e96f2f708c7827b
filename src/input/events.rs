//! Renderer-agnostic input event types.
//!
//! The host translates its native pointer, touch, keyboard and map life-cycle
//! events into these values before handing them to the dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::gesture::PointSnapshot;
use super::modifiers::Modifiers;
use crate::util::Point;

/// Primary button value shared by the `buttons` bitmask and the legacy `which` code.
const PRIMARY_BUTTON: u16 = 1;

/// Generic key representation for cross-host compatibility.
///
/// Hosts map their native key names to these values. Serialized as the same
/// string names used in keybinding configuration (`"Delete"`, `"a"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    Escape,
    Return,
    Backspace,
    Delete,
    Tab,
    Space,
    Shift,
    Ctrl,
    Alt,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Name used when matching against configured keybindings.
    pub fn binding_name(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Return => "Return".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Space => "Space".to_string(),
            Key::Shift => "Shift".to_string(),
            Key::Ctrl => "Ctrl".to_string(),
            Key::Alt => "Alt".to_string(),
            Key::Unknown => String::new(),
        }
    }
}

impl FromStr for Key {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(if c == ' ' { Key::Space } else { Key::Char(c) });
        }

        match s.to_lowercase().as_str() {
            "escape" | "esc" => Ok(Key::Escape),
            "return" | "enter" => Ok(Key::Return),
            "backspace" => Ok(Key::Backspace),
            "delete" | "del" => Ok(Key::Delete),
            "tab" => Ok(Key::Tab),
            "space" => Ok(Key::Space),
            "shift" => Ok(Key::Shift),
            "ctrl" | "control" => Ok(Key::Ctrl),
            "alt" => Ok(Key::Alt),
            "" | "unknown" => Ok(Key::Unknown),
            _ => Err(()),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|_| format!("unrecognized key name '{value}'"))
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Unknown => "Unknown".to_string(),
            other => other.binding_name(),
        }
    }
}

/// A pointer sample from either a mouse or a touch source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Screen position relative to the map container
    pub point: Point,
    /// Event timestamp in milliseconds
    #[serde(default)]
    pub time: u64,
    /// Pressed-button bitmask, when the input source reports one
    #[serde(default)]
    pub buttons: Option<u16>,
    /// Legacy pressed-button code, used when `buttons` is absent
    #[serde(default)]
    pub which: Option<u16>,
}

impl PointerEvent {
    pub fn new(point: Point, time: u64) -> Self {
        Self {
            point,
            time,
            buttons: None,
            which: None,
        }
    }

    /// Sets the `buttons` bitmask.
    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = Some(buttons);
        self
    }

    /// Sets the legacy `which` code.
    pub fn with_which(mut self, which: u16) -> Self {
        self.which = Some(which);
        self
    }

    /// Whether exactly the primary button is held.
    ///
    /// `buttons` wins whenever it is present; `which` is only consulted for
    /// sources that never populate the bitmask.
    pub fn primary_button_held(&self) -> bool {
        match self.buttons {
            Some(buttons) => buttons == PRIMARY_BUTTON,
            None => self.which == Some(PRIMARY_BUTTON),
        }
    }

    pub fn snapshot(&self) -> PointSnapshot {
        PointSnapshot::new(self.point, self.time)
    }
}

/// A key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::new(),
        }
    }
}

/// Renderer data notification. `data_type == "style"` signals a style refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEvent {
    pub data_type: String,
}

impl DataEvent {
    pub const STYLE: &'static str = "style";

    pub fn style() -> Self {
        Self {
            data_type: Self::STYLE.to_string(),
        }
    }

    pub fn is_style(&self) -> bool {
        self.data_type == Self::STYLE
    }
}

/// Camera zoom finished changing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoomEvent {
    pub zoom: f64,
}

/// Every event the dispatcher understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    MouseMove(PointerEvent),
    MouseDown(PointerEvent),
    MouseUp(PointerEvent),
    MouseOut(PointerEvent),
    TouchStart(PointerEvent),
    TouchMove(PointerEvent),
    TouchEnd(PointerEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    Data(DataEvent),
    ZoomEnd(ZoomEvent),
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::MouseMove(_) => EventKind::MouseMove,
            InputEvent::MouseDown(_) => EventKind::MouseDown,
            InputEvent::MouseUp(_) => EventKind::MouseUp,
            InputEvent::MouseOut(_) => EventKind::MouseOut,
            InputEvent::TouchStart(_) => EventKind::TouchStart,
            InputEvent::TouchMove(_) => EventKind::TouchMove,
            InputEvent::TouchEnd(_) => EventKind::TouchEnd,
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::Data(_) => EventKind::Data,
            InputEvent::ZoomEnd(_) => EventKind::ZoomEnd,
        }
    }

    /// Builds the event for `kind` from an untyped JSON payload.
    pub fn from_payload(
        kind: EventKind,
        payload: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let event = match kind {
            EventKind::MouseMove => InputEvent::MouseMove(serde_json::from_value(payload)?),
            EventKind::MouseDown => InputEvent::MouseDown(serde_json::from_value(payload)?),
            EventKind::MouseUp => InputEvent::MouseUp(serde_json::from_value(payload)?),
            EventKind::MouseOut => InputEvent::MouseOut(serde_json::from_value(payload)?),
            EventKind::TouchStart => InputEvent::TouchStart(serde_json::from_value(payload)?),
            EventKind::TouchMove => InputEvent::TouchMove(serde_json::from_value(payload)?),
            EventKind::TouchEnd => InputEvent::TouchEnd(serde_json::from_value(payload)?),
            EventKind::KeyDown => InputEvent::KeyDown(serde_json::from_value(payload)?),
            EventKind::KeyUp => InputEvent::KeyUp(serde_json::from_value(payload)?),
            EventKind::Data => InputEvent::Data(serde_json::from_value(payload)?),
            EventKind::ZoomEnd => InputEvent::ZoomEnd(serde_json::from_value(payload)?),
        };
        Ok(event)
    }
}

/// Event names, as used for listener registration and [`fire`](crate::input::Dispatcher::fire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseMove,
    MouseDown,
    MouseUp,
    MouseOut,
    TouchStart,
    TouchMove,
    TouchEnd,
    KeyDown,
    KeyUp,
    Data,
    ZoomEnd,
}

impl EventKind {
    /// Events subscribed on the map object itself.
    pub const MAP_EVENTS: [EventKind; 10] = [
        EventKind::MouseMove,
        EventKind::MouseDown,
        EventKind::MouseUp,
        EventKind::Data,
        EventKind::TouchMove,
        EventKind::TouchStart,
        EventKind::TouchEnd,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::ZoomEnd,
    ];

    /// Events subscribed on the surrounding container element.
    pub const CONTAINER_EVENTS: [EventKind; 1] = [EventKind::MouseOut];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MouseMove => "mousemove",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::MouseOut => "mouseout",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Data => "data",
            EventKind::ZoomEnd => "zoomend",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mousemove" => Ok(EventKind::MouseMove),
            "mousedown" => Ok(EventKind::MouseDown),
            "mouseup" => Ok(EventKind::MouseUp),
            "mouseout" => Ok(EventKind::MouseOut),
            "touchstart" => Ok(EventKind::TouchStart),
            "touchmove" => Ok(EventKind::TouchMove),
            "touchend" => Ok(EventKind::TouchEnd),
            "keydown" => Ok(EventKind::KeyDown),
            "keyup" => Ok(EventKind::KeyUp),
            "data" => Ok(EventKind::Data),
            "zoomend" => Ok(EventKind::ZoomEnd),
            _ => Err(()),
        }
    }
}

/// What the host should do with its native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Suppress the platform's default or emulated follow-up behavior
    pub prevent_default: bool,
    /// Stop the native event from reaching outer listeners
    pub stop_propagation: bool,
}

impl EventOutcome {
    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    pub fn stop_propagation() -> Self {
        Self {
            prevent_default: false,
            stop_propagation: true,
        }
    }

    pub fn merge(self, other: EventOutcome) -> Self {
        Self {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_take_priority_over_which() {
        let event = PointerEvent::new(Point::new(0.0, 0.0), 0)
            .with_buttons(0)
            .with_which(1);
        assert!(!event.primary_button_held());

        let event = PointerEvent::new(Point::new(0.0, 0.0), 0).with_which(1);
        assert!(event.primary_button_held());

        let event = PointerEvent::new(Point::new(0.0, 0.0), 0).with_buttons(1);
        assert!(event.primary_button_held());
    }

    #[test]
    fn test_primary_plus_secondary_is_not_a_primary_drag() {
        let event = PointerEvent::new(Point::new(0.0, 0.0), 0).with_buttons(3);
        assert!(!event.primary_button_held());
    }

    #[test]
    fn test_event_kind_names_round_trip() {
        for kind in EventKind::MAP_EVENTS
            .iter()
            .chain(EventKind::CONTAINER_EVENTS.iter())
        {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(*kind));
        }
        assert!("nonexistentEvent".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_input_event_deserializes_from_tagged_json() {
        let json = r#"{"type":"mousedown","point":{"x":1.0,"y":2.0},"time":10,"buttons":1}"#;
        let event: InputEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            InputEvent::MouseDown(PointerEvent::new(Point::new(1.0, 2.0), 10).with_buttons(1))
        );

        let json = r#"{"type":"keydown","key":"Delete"}"#;
        let event: InputEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, InputEvent::KeyDown(KeyEvent::new(Key::Delete)));
    }

    #[test]
    fn test_from_payload_rejects_mismatched_shape() {
        let payload = serde_json::json!({ "key": "a" });
        assert!(InputEvent::from_payload(EventKind::MouseDown, payload).is_err());

        let payload = serde_json::json!({ "key": "a" });
        assert_eq!(
            InputEvent::from_payload(EventKind::KeyUp, payload).unwrap(),
            InputEvent::KeyUp(KeyEvent::new(Key::Char('a')))
        );
    }

    #[test]
    fn test_key_parses_names_and_characters() {
        assert_eq!("Delete".parse::<Key>(), Ok(Key::Delete));
        assert_eq!("backspace".parse::<Key>(), Ok(Key::Backspace));
        assert_eq!("1".parse::<Key>(), Ok(Key::Char('1')));
        assert_eq!(" ".parse::<Key>(), Ok(Key::Space));
        assert!("Hyper".parse::<Key>().is_err());
    }
}
