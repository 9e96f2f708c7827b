use log::trace;
use serde_json::Value;

use super::{GestureEvent, Mode, ModeContext, ModeOptions};
use crate::host::Store;
use crate::input::KeyEvent;

/// Pointer callbacks a mode can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerCallback {
    MouseDown,
    MouseUp,
    MouseMove,
    MouseOut,
    Drag,
    Click,
    TouchStart,
    TouchMove,
    TouchEnd,
    Tap,
}

impl PointerCallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerCallback::MouseDown => "mousedown",
            PointerCallback::MouseUp => "mouseup",
            PointerCallback::MouseMove => "mousemove",
            PointerCallback::MouseOut => "mouseout",
            PointerCallback::Drag => "drag",
            PointerCallback::Click => "click",
            PointerCallback::TouchStart => "touchstart",
            PointerCallback::TouchMove => "touchmove",
            PointerCallback::TouchEnd => "touchend",
            PointerCallback::Tap => "tap",
        }
    }
}

/// Keyboard callbacks a mode can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCallback {
    KeyDown,
    KeyUp,
}

impl KeyCallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCallback::KeyDown => "keydown",
            KeyCallback::KeyUp => "keyup",
        }
    }
}

/// The active mode instance, started on construction.
///
/// One handler exists per active mode. It is dropped after [`stop`](Self::stop)
/// when the dispatcher switches away.
pub struct ModeHandler {
    name: String,
    mode: Box<dyn Mode>,
}

impl std::fmt::Debug for ModeHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ModeHandler {
    /// Wraps `mode` and runs its `start` hook.
    pub fn new(name: impl Into<String>, mut mode: Box<dyn Mode>, ctx: &mut ModeContext) -> Self {
        let name = name.into();
        trace!("starting mode '{name}'");
        mode.start(ctx);
        Self { name, mode }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop(&mut self, ctx: &mut ModeContext) {
        trace!("stopping mode '{}'", self.name);
        self.mode.stop(ctx);
    }

    pub fn render(&self, feature: &Value, push: &mut dyn FnMut(Value)) {
        self.mode.render(feature, push);
    }

    pub fn pointer(&mut self, callback: PointerCallback, ctx: &mut ModeContext, event: &GestureEvent) {
        trace!("{} -> {}", callback.as_str(), self.name);
        let mode = self.mode.as_mut();
        match callback {
            PointerCallback::MouseDown => mode.mousedown(ctx, event),
            PointerCallback::MouseUp => mode.mouseup(ctx, event),
            PointerCallback::MouseMove => mode.mousemove(ctx, event),
            PointerCallback::MouseOut => mode.mouseout(ctx, event),
            PointerCallback::Drag => mode.drag(ctx, event),
            PointerCallback::Click => mode.click(ctx, event),
            PointerCallback::TouchStart => mode.touchstart(ctx, event),
            PointerCallback::TouchMove => mode.touchmove(ctx, event),
            PointerCallback::TouchEnd => mode.touchend(ctx, event),
            PointerCallback::Tap => mode.tap(ctx, event),
        }
    }

    pub fn key(&mut self, callback: KeyCallback, ctx: &mut ModeContext, event: &KeyEvent) {
        trace!("{} -> {}", callback.as_str(), self.name);
        match callback {
            KeyCallback::KeyDown => self.mode.keydown(ctx, event),
            KeyCallback::KeyUp => self.mode.keyup(ctx, event),
        }
    }

    /// Runs the mode's trash action, then re-renders the store.
    pub fn trash<S>(&mut self, ctx: &mut ModeContext, options: &ModeOptions, store: &mut S)
    where
        S: Store + ?Sized,
    {
        self.mode.trash(ctx, options);
        store.render();
    }

    pub fn combine_features(&mut self, ctx: &mut ModeContext) {
        self.mode.combine_features(ctx);
    }

    pub fn uncombine_features(&mut self, ctx: &mut ModeContext) {
        self.mode.uncombine_features(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;
    use crate::util::Point;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Empty;
    impl Mode for Empty {}

    struct Counting {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Mode for Counting {
        fn start(&mut self, _ctx: &mut ModeContext) {
            self.log.borrow_mut().push("start");
        }

        fn click(&mut self, _ctx: &mut ModeContext, _event: &GestureEvent) {
            self.log.borrow_mut().push("click");
        }

        fn render(&self, feature: &Value, push: &mut dyn FnMut(Value)) {
            push(feature.clone());
            push(json!({ "type": "Feature", "properties": { "meta": "midpoint" } }));
        }
    }

    fn event() -> GestureEvent {
        GestureEvent::untargeted(PointerEvent::new(Point::new(0.0, 0.0), 0))
    }

    #[test]
    fn test_missing_callbacks_are_no_ops() {
        let mut ctx = ModeContext::new();
        let mut handler = ModeHandler::new("empty", Box::new(Empty), &mut ctx);
        for callback in [
            PointerCallback::MouseDown,
            PointerCallback::MouseUp,
            PointerCallback::MouseMove,
            PointerCallback::MouseOut,
            PointerCallback::Drag,
            PointerCallback::Click,
            PointerCallback::TouchStart,
            PointerCallback::TouchMove,
            PointerCallback::TouchEnd,
            PointerCallback::Tap,
        ] {
            handler.pointer(callback, &mut ctx, &event());
        }
        handler.combine_features(&mut ctx);
        handler.uncombine_features(&mut ctx);
        handler.stop(&mut ctx);
        assert!(!ctx.has_requests());
    }

    #[test]
    fn test_start_runs_on_construction_and_callbacks_forward() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ModeContext::new();
        let mut handler = ModeHandler::new("counting", Box::new(Counting { log: log.clone() }), &mut ctx);
        handler.pointer(PointerCallback::Click, &mut ctx, &event());
        handler.pointer(PointerCallback::Tap, &mut ctx, &event());

        assert_eq!(*log.borrow(), vec!["start", "click"]);
        assert_eq!(handler.name(), "counting");
    }

    #[test]
    fn test_render_defaults_to_pass_through() {
        let mut ctx = ModeContext::new();
        let handler = ModeHandler::new("empty", Box::new(Empty), &mut ctx);
        let feature = json!({ "type": "Feature", "id": "a" });

        let mut out = Vec::new();
        handler.render(&feature, &mut |f| out.push(f));
        assert_eq!(out, vec![feature]);
    }

    #[test]
    fn test_render_may_push_extra_features() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ModeContext::new();
        let handler = ModeHandler::new("counting", Box::new(Counting { log }), &mut ctx);

        let mut out = Vec::new();
        handler.render(&json!({ "type": "Feature" }), &mut |f| out.push(f));
        assert_eq!(out.len(), 2);
    }
}
