//! Modes shipped with the crate.
//!
//! Real editors register their own drawing modes. These cover the two modes
//! every editor needs plus a tracing decorator used by the replay tool.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use super::{GestureEvent, Mode, ModeContext, ModeOptions};
use crate::actionable::{ActionPatch, Capability};
use crate::input::{Key, KeyEvent};
use crate::util::Point;

/// A mode that ignores all input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticMode;

impl Mode for StaticMode {}

/// Click or tap a feature to select it; click empty space to clear.
///
/// Mode options may carry `{"featureIds": ["a", "b"]}` to start with a selection.
#[derive(Debug, Default, Clone)]
pub struct SimpleSelectMode {
    selected: BTreeSet<String>,
}

impl SimpleSelectMode {
    pub fn from_options(options: &ModeOptions) -> Self {
        let selected = options
            .get("featureIds")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self { selected }
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    fn select_target(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        match &event.feature_target {
            Some(feature) => {
                self.selected.clear();
                self.selected.insert(feature.id.clone());
            }
            None => self.selected.clear(),
        }
        self.publish(ctx);
    }

    fn publish(&self, ctx: &mut ModeContext) {
        ctx.actionable(
            ActionPatch::new()
                .set(Capability::Trash, !self.selected.is_empty())
                .set(Capability::CombineFeatures, self.selected.len() > 1),
        );
    }
}

impl Mode for SimpleSelectMode {
    fn start(&mut self, ctx: &mut ModeContext) {
        self.publish(ctx);
    }

    fn stop(&mut self, ctx: &mut ModeContext) {
        self.selected.clear();
        self.publish(ctx);
    }

    fn render(&self, feature: &Value, push: &mut dyn FnMut(Value)) {
        let mut display = feature.clone();
        let active = feature
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| self.selected.contains(id));
        if let Some(obj) = display.as_object_mut() {
            let properties = obj.entry("properties").or_insert(Value::Null);
            // GeoJSON allows `"properties": null`
            if properties.is_null() {
                *properties = Value::Object(Default::default());
            }
            if let Some(properties) = properties.as_object_mut() {
                properties.insert(
                    "active".to_string(),
                    Value::String(if active { "true" } else { "false" }.to_string()),
                );
            }
        }
        push(display);
    }

    fn click(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.select_target(ctx, event);
    }

    fn tap(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.select_target(ctx, event);
    }

    fn keyup(&mut self, ctx: &mut ModeContext, event: &KeyEvent) {
        if event.key == Key::Escape && !self.selected.is_empty() {
            self.selected.clear();
            self.publish(ctx);
        }
    }

    fn trash(&mut self, ctx: &mut ModeContext, _options: &ModeOptions) {
        self.selected.clear();
        self.publish(ctx);
    }
}

// =============================================================================
// Tracing decorator
// =============================================================================

/// One callback observed by [`Traced`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub mode: String,
    pub callback: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Shared, single-threaded trace sink.
pub type TraceLog = Rc<RefCell<Vec<TraceEntry>>>;

/// Records every callback into a [`TraceLog`] before forwarding it.
#[derive(Debug)]
pub struct Traced<M> {
    name: String,
    inner: M,
    log: TraceLog,
}

impl<M: Mode> Traced<M> {
    pub fn new(name: impl Into<String>, inner: M, log: TraceLog) -> Self {
        Self {
            name: name.into(),
            inner,
            log,
        }
    }

    fn record(&self, callback: &'static str) {
        self.push(callback, None, None, None);
    }

    fn record_pointer(&self, callback: &'static str, event: &GestureEvent) {
        self.push(
            callback,
            Some(event.input.point),
            event.feature_target.as_ref().map(|f| f.id.clone()),
            None,
        );
    }

    fn record_key(&self, callback: &'static str, event: &KeyEvent) {
        self.push(callback, None, None, Some(event.key.binding_name()));
    }

    fn push(
        &self,
        callback: &'static str,
        point: Option<Point>,
        feature: Option<String>,
        key: Option<String>,
    ) {
        self.log.borrow_mut().push(TraceEntry {
            mode: self.name.clone(),
            callback,
            point,
            feature,
            key,
        });
    }
}

impl<M: Mode> Mode for Traced<M> {
    fn start(&mut self, ctx: &mut ModeContext) {
        self.record("start");
        self.inner.start(ctx);
    }

    fn stop(&mut self, ctx: &mut ModeContext) {
        self.record("stop");
        self.inner.stop(ctx);
    }

    fn render(&self, feature: &Value, push: &mut dyn FnMut(Value)) {
        self.inner.render(feature, push);
    }

    fn mousedown(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("mousedown", event);
        self.inner.mousedown(ctx, event);
    }

    fn mouseup(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("mouseup", event);
        self.inner.mouseup(ctx, event);
    }

    fn mousemove(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("mousemove", event);
        self.inner.mousemove(ctx, event);
    }

    fn mouseout(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("mouseout", event);
        self.inner.mouseout(ctx, event);
    }

    fn drag(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("drag", event);
        self.inner.drag(ctx, event);
    }

    fn click(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("click", event);
        self.inner.click(ctx, event);
    }

    fn touchstart(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("touchstart", event);
        self.inner.touchstart(ctx, event);
    }

    fn touchmove(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("touchmove", event);
        self.inner.touchmove(ctx, event);
    }

    fn touchend(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("touchend", event);
        self.inner.touchend(ctx, event);
    }

    fn tap(&mut self, ctx: &mut ModeContext, event: &GestureEvent) {
        self.record_pointer("tap", event);
        self.inner.tap(ctx, event);
    }

    fn keydown(&mut self, ctx: &mut ModeContext, event: &KeyEvent) {
        self.record_key("keydown", event);
        self.inner.keydown(ctx, event);
    }

    fn keyup(&mut self, ctx: &mut ModeContext, event: &KeyEvent) {
        self.record_key("keyup", event);
        self.inner.keyup(ctx, event);
    }

    fn trash(&mut self, ctx: &mut ModeContext, options: &ModeOptions) {
        self.record("trash");
        self.inner.trash(ctx, options);
    }

    fn combine_features(&mut self, ctx: &mut ModeContext) {
        self.record("combineFeatures");
        self.inner.combine_features(ctx);
    }

    fn uncombine_features(&mut self, ctx: &mut ModeContext) {
        self.record("uncombineFeatures");
        self.inner.uncombine_features(ctx);
    }
}
