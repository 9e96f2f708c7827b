//! Interfaces to the map renderer and application that host the editor.
//!
//! The dispatcher never talks to a renderer directly. Hit testing, listener
//! registration, style-class updates, persisted-state refreshes and outward
//! notifications all go through the traits in this module. [`Host`] bundles
//! them and is implemented automatically for any type providing all five.
//!
//! [`RecordingHost`] is an in-memory implementation used by the replay CLI
//! and by tests.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actionable::ActionState;
use crate::input::{EventKind, PointerEvent};
use crate::util::Point;

/// Minimal projection of a hit-tested feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub id: String,
    /// Whether the feature is currently selected
    #[serde(default)]
    pub active: bool,
    /// Free-form tag used to pick a feature style class (e.g. "vertex")
    #[serde(default)]
    pub meta: Option<String>,
}

impl FeatureDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: false,
            meta: None,
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }
}

/// Cursor hint shown over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorClass {
    None,
    Pointer,
    Move,
    Drag,
}

impl CursorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorClass::None => "none",
            CursorClass::Pointer => "pointer",
            CursorClass::Move => "move",
            CursorClass::Drag => "drag",
        }
    }
}

impl fmt::Display for CursorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A style-class update. `Some` fields replace the queued value for that
/// class type; `None` fields leave it as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleClasses {
    pub mode: Option<String>,
    pub mouse: Option<CursorClass>,
    pub feature: Option<String>,
}

impl StyleClasses {
    pub fn mouse(cursor: CursorClass) -> Self {
        Self {
            mouse: Some(cursor),
            ..Self::default()
        }
    }

    /// Folds `patch` into `self`.
    pub fn merge(&mut self, patch: StyleClasses) {
        if patch.mode.is_some() {
            self.mode = patch.mode;
        }
        if patch.mouse.is_some() {
            self.mouse = patch.mouse;
        }
        if patch.feature.is_some() {
            self.feature = patch.feature;
        }
    }
}

/// Events emitted to the host application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Notification {
    /// A non-silent mode transition completed
    ModeChange { mode: String },
    /// The capability flag set changed
    Actionable { actions: ActionState },
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerTarget {
    /// The map/view object
    Map,
    /// The element containing the map surface
    Container,
}

/// Hit testing against rendered features, topmost first.
pub trait FeatureQuery {
    fn query_mouse(&self, event: &PointerEvent) -> Vec<FeatureDescriptor>;
    fn query_touch(&self, event: &PointerEvent) -> Vec<FeatureDescriptor>;
}

/// Listener registration and overlay style layers.
pub trait MapView {
    fn on(&mut self, target: ListenerTarget, kind: EventKind);
    fn off(&mut self, target: ListenerTarget, kind: EventKind);
    fn has_layer(&self, id: &str) -> bool;
    /// Adds the editor's overlay sources and layers to the current style.
    fn add_layers(&mut self);
}

/// Cursor and feature style classes on the map container.
pub trait UiSink {
    fn queue_style_classes(&mut self, classes: StyleClasses);
    fn apply_queued_style_classes(&mut self);
}

/// Persisted feature state.
pub trait Store {
    fn set_dirty(&mut self);
    fn render(&mut self);
    fn change_zoom(&mut self, zoom: f64);
}

/// Outward event channel to the host application.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Everything the dispatcher needs from its environment.
pub trait Host: FeatureQuery + MapView + UiSink + Store + Notifier {}

impl<T> Host for T where T: FeatureQuery + MapView + UiSink + Store + Notifier {}

// =============================================================================
// In-memory host
// =============================================================================

/// A call made by the dispatcher into [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    On(ListenerTarget, EventKind),
    Off(ListenerTarget, EventKind),
    AddLayers,
    QueueStyle(StyleClasses),
    ApplyStyle,
    SetDirty,
    Render,
    ChangeZoom(f64),
    Notify(Notification),
}

/// A circular hit area standing in for a rendered feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitArea {
    pub feature: FeatureDescriptor,
    pub center: Point,
    pub radius: f64,
}

/// In-memory host that hit-tests circles and records every call.
#[derive(Debug)]
pub struct RecordingHost {
    /// Later entries are drawn on top
    areas: Vec<HitArea>,
    overlay_layers: Vec<String>,
    layers: BTreeSet<String>,
    touch_buffer: f64,
    queued: StyleClasses,
    applied: StyleClasses,
    calls: Vec<HostCall>,
    mouse_queries: Cell<usize>,
    touch_queries: Cell<usize>,
}

impl RecordingHost {
    /// Default extra radius for touch hit testing, in pixels.
    pub const TOUCH_BUFFER: f64 = 25.0;

    /// Creates a host whose style already contains `overlay_layers`.
    pub fn new(overlay_layers: Vec<String>) -> Self {
        let layers = overlay_layers.iter().cloned().collect();
        Self {
            areas: Vec::new(),
            overlay_layers,
            layers,
            touch_buffer: Self::TOUCH_BUFFER,
            queued: StyleClasses::default(),
            applied: StyleClasses::default(),
            calls: Vec::new(),
            mouse_queries: Cell::new(0),
            touch_queries: Cell::new(0),
        }
    }

    pub fn with_touch_buffer(mut self, buffer: f64) -> Self {
        self.touch_buffer = buffer;
        self
    }

    /// Adds a feature on top of the existing ones.
    pub fn add_feature(&mut self, area: HitArea) {
        self.areas.push(area);
    }

    /// Removes a style layer, as an external style reset would.
    pub fn remove_layer(&mut self, id: &str) {
        self.layers.remove(id);
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drains the recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn notifications(&self) -> Vec<&Notification> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    /// Style classes as of the last apply.
    pub fn applied_classes(&self) -> &StyleClasses {
        &self.applied
    }

    pub fn mouse_queries(&self) -> usize {
        self.mouse_queries.get()
    }

    pub fn touch_queries(&self) -> usize {
        self.touch_queries.get()
    }

    fn hits(&self, at: Point, buffer: f64) -> Vec<FeatureDescriptor> {
        self.areas
            .iter()
            .rev()
            .filter(|area| area.center.distance(&at) <= area.radius + buffer)
            .map(|area| area.feature.clone())
            .collect()
    }
}

impl FeatureQuery for RecordingHost {
    fn query_mouse(&self, event: &PointerEvent) -> Vec<FeatureDescriptor> {
        self.mouse_queries.set(self.mouse_queries.get() + 1);
        self.hits(event.point, 0.0)
    }

    fn query_touch(&self, event: &PointerEvent) -> Vec<FeatureDescriptor> {
        self.touch_queries.set(self.touch_queries.get() + 1);
        self.hits(event.point, self.touch_buffer)
    }
}

impl MapView for RecordingHost {
    fn on(&mut self, target: ListenerTarget, kind: EventKind) {
        self.calls.push(HostCall::On(target, kind));
    }

    fn off(&mut self, target: ListenerTarget, kind: EventKind) {
        self.calls.push(HostCall::Off(target, kind));
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains(id)
    }

    fn add_layers(&mut self) {
        self.layers.extend(self.overlay_layers.iter().cloned());
        self.calls.push(HostCall::AddLayers);
    }
}

impl UiSink for RecordingHost {
    fn queue_style_classes(&mut self, classes: StyleClasses) {
        self.queued.merge(classes.clone());
        self.calls.push(HostCall::QueueStyle(classes));
    }

    fn apply_queued_style_classes(&mut self) {
        self.applied.merge(std::mem::take(&mut self.queued));
        self.calls.push(HostCall::ApplyStyle);
    }
}

impl Store for RecordingHost {
    fn set_dirty(&mut self) {
        self.calls.push(HostCall::SetDirty);
    }

    fn render(&mut self) {
        self.calls.push(HostCall::Render);
    }

    fn change_zoom(&mut self, zoom: f64) {
        self.calls.push(HostCall::ChangeZoom(zoom));
    }
}

impl Notifier for RecordingHost {
    fn notify(&mut self, notification: Notification) {
        self.calls.push(HostCall::Notify(notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: &str, x: f64, y: f64, radius: f64) -> HitArea {
        HitArea {
            feature: FeatureDescriptor::new(id),
            center: Point::new(x, y),
            radius,
        }
    }

    #[test]
    fn test_topmost_feature_is_returned_first() {
        let mut host = RecordingHost::new(Vec::new());
        host.add_feature(area("below", 0.0, 0.0, 10.0));
        host.add_feature(area("above", 2.0, 0.0, 10.0));

        let hits = host.query_mouse(&PointerEvent::new(Point::new(1.0, 0.0), 0));
        let ids: Vec<_> = hits.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["above", "below"]);
        assert_eq!(host.mouse_queries(), 1);
    }

    #[test]
    fn test_touch_queries_use_a_larger_buffer() {
        let mut host = RecordingHost::new(Vec::new()).with_touch_buffer(20.0);
        host.add_feature(area("point", 0.0, 0.0, 5.0));

        let event = PointerEvent::new(Point::new(15.0, 0.0), 0);
        assert!(host.query_mouse(&event).is_empty());
        assert_eq!(host.query_touch(&event).len(), 1);
    }

    #[test]
    fn test_queued_classes_apply_as_a_merge() {
        let mut host = RecordingHost::new(Vec::new());
        host.queue_style_classes(StyleClasses {
            mode: Some("simple_select".to_string()),
            mouse: Some(CursorClass::Pointer),
            feature: Some("vertex".to_string()),
        });
        host.apply_queued_style_classes();
        host.queue_style_classes(StyleClasses::mouse(CursorClass::Drag));
        host.apply_queued_style_classes();

        let applied = host.applied_classes();
        assert_eq!(applied.mouse, Some(CursorClass::Drag));
        assert_eq!(applied.feature.as_deref(), Some("vertex"));
        assert_eq!(applied.mode.as_deref(), Some("simple_select"));
    }

    #[test]
    fn test_removed_layers_come_back_on_add_layers() {
        let mut host = RecordingHost::new(vec!["a".to_string(), "b".to_string()]);
        host.remove_layer("a");
        assert!(!host.has_layer("a"));
        host.add_layers();
        assert!(host.has_layer("a"));
        assert_eq!(host.calls(), &[HostCall::AddLayers]);
    }

    #[test]
    fn test_notifications_serialize_with_type_tag() {
        let value = serde_json::to_value(Notification::ModeChange {
            mode: "static".to_string(),
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "modechange", "mode": "static" })
        );
    }
}
