use log::{debug, trace};

use super::core::{DispatchError, Dispatcher};
use crate::host::{CursorClass, FeatureDescriptor, Host, StyleClasses};
use crate::input::events::{EventOutcome, PointerEvent};
use crate::input::gesture::{PointSnapshot, is_click};
use crate::input::locate;
use crate::mode::{GestureEvent, PointerCallback};

impl<H: Host> Dispatcher<H> {
    /// Processes pointer motion.
    ///
    /// # Behavior
    /// - Primary button held: evaluated as a drag against the last mousedown
    /// - Otherwise: hover, forwarded to `mousemove` with the feature under the pointer
    pub(super) fn on_mouse_move(
        &mut self,
        event: PointerEvent,
    ) -> Result<EventOutcome, DispatchError> {
        if event.primary_button_held() {
            let start = self.mouse_down_info;
            let thresholds = self.thresholds;
            return self.drag(event, |end| !is_click(start.as_ref(), end, &thresholds));
        }

        let target = self.locate_mouse(&event);
        self.dispatch_pointer(PointerCallback::MouseMove, GestureEvent::new(event, target))?;
        Ok(EventOutcome::default())
    }

    /// Processes a mouse button press and remembers where it started.
    pub(super) fn on_mouse_down(
        &mut self,
        event: PointerEvent,
    ) -> Result<EventOutcome, DispatchError> {
        self.mouse_down_info = Some(event.snapshot());
        let target = self.locate_mouse(&event);
        self.dispatch_pointer(PointerCallback::MouseDown, GestureEvent::new(event, target))?;
        Ok(EventOutcome::default())
    }

    /// Processes a mouse button release.
    ///
    /// A release close in space and time to the last press is a `click`;
    /// anything else is a plain `mouseup`. Never both.
    pub(super) fn on_mouse_up(&mut self, event: PointerEvent) -> Result<EventOutcome, DispatchError> {
        let target = self.locate_mouse(&event);
        let callback = if is_click(
            self.mouse_down_info.as_ref(),
            &event.snapshot(),
            &self.thresholds,
        ) {
            PointerCallback::Click
        } else {
            PointerCallback::MouseUp
        };
        debug!("mouseup classified as {}", callback.as_str());
        self.dispatch_pointer(callback, GestureEvent::new(event, target))?;
        Ok(EventOutcome::default())
    }

    /// The pointer left the map container; no feature lookup.
    pub(super) fn on_mouse_out(
        &mut self,
        event: PointerEvent,
    ) -> Result<EventOutcome, DispatchError> {
        self.dispatch_pointer(PointerCallback::MouseOut, GestureEvent::untargeted(event))?;
        Ok(EventOutcome::default())
    }

    /// Shared drag evaluation for mouse and touch.
    ///
    /// When `is_drag` holds for the current position the cursor switches to
    /// the drag hint and the mode receives `drag`. Otherwise the native event
    /// must not propagate further.
    pub(super) fn drag<F>(
        &mut self,
        event: PointerEvent,
        is_drag: F,
    ) -> Result<EventOutcome, DispatchError>
    where
        F: FnOnce(&PointSnapshot) -> bool,
    {
        if !is_drag(&event.snapshot()) {
            return Ok(EventOutcome::stop_propagation());
        }

        self.host
            .queue_style_classes(StyleClasses::mouse(CursorClass::Drag));
        trace!("drag at ({:.1}, {:.1})", event.point.x, event.point.y);
        self.dispatch_pointer(PointerCallback::Drag, GestureEvent::untargeted(event))?;
        Ok(EventOutcome::default())
    }

    fn locate_mouse(&mut self, event: &PointerEvent) -> Option<FeatureDescriptor> {
        let mode_name = self.current_mode_name().map(str::to_string);
        locate::locate_mouse(&mut self.host, event, mode_name.as_deref())
    }

    pub(super) fn dispatch_pointer(
        &mut self,
        callback: PointerCallback,
        event: GestureEvent,
    ) -> Result<(), DispatchError> {
        self.run_mode(|mode, ctx, _| mode.pointer(callback, ctx, &event))
    }
}
