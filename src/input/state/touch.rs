use super::core::{DispatchError, Dispatcher};
use crate::host::Host;
use crate::input::events::{EventOutcome, PointerEvent};
use crate::input::gesture::is_tap;
use crate::input::locate;
use crate::mode::{GestureEvent, PointerCallback};

impl<H: Host> Dispatcher<H> {
    /// Records where the touch began and forwards `touchstart`.
    ///
    /// The outcome asks the host to suppress emulated mouse events. With touch
    /// disabled the event is ignored entirely.
    pub(super) fn on_touch_start(
        &mut self,
        event: PointerEvent,
    ) -> Result<EventOutcome, DispatchError> {
        if !self.touch_enabled {
            return Ok(EventOutcome::default());
        }

        self.touch_start_info = Some(event.snapshot());
        let target = locate::locate_touch(&self.host, &event);
        self.dispatch_pointer(PointerCallback::TouchStart, GestureEvent::new(event, target))?;
        Ok(EventOutcome::prevent_default())
    }

    /// Forwards `touchmove`, then evaluates the motion as a possible drag.
    pub(super) fn on_touch_move(
        &mut self,
        event: PointerEvent,
    ) -> Result<EventOutcome, DispatchError> {
        if !self.touch_enabled {
            return Ok(EventOutcome::default());
        }

        self.dispatch_pointer(PointerCallback::TouchMove, GestureEvent::untargeted(event))?;

        let start = self.touch_start_info;
        let thresholds = self.thresholds;
        let outcome = self.drag(event, |end| !is_tap(start.as_ref(), end, &thresholds))?;
        Ok(outcome.merge(EventOutcome::prevent_default()))
    }

    /// Classifies a touch release as `tap` or plain `touchend`.
    ///
    /// Default handling is suppressed even with touch disabled, so the host
    /// never synthesizes a click from a touch the editor chose to ignore.
    pub(super) fn on_touch_end(
        &mut self,
        event: PointerEvent,
    ) -> Result<EventOutcome, DispatchError> {
        if self.touch_enabled {
            let target = locate::locate_touch(&self.host, &event);
            let callback = if is_tap(
                self.touch_start_info.as_ref(),
                &event.snapshot(),
                &self.thresholds,
            ) {
                PointerCallback::Tap
            } else {
                PointerCallback::TouchEnd
            };
            self.dispatch_pointer(callback, GestureEvent::new(event, target))?;
        }
        Ok(EventOutcome::prevent_default())
    }
}
