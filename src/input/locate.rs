//! Feature lookup under the pointer.

use log::trace;

use super::events::PointerEvent;
use crate::host::{CursorClass, FeatureDescriptor, FeatureQuery, StyleClasses, UiSink};

/// Cursor hint for the topmost feature under the mouse.
pub fn cursor_for(target: Option<&FeatureDescriptor>) -> CursorClass {
    match target {
        None => CursorClass::None,
        Some(feature) if feature.active => CursorClass::Move,
        Some(_) => CursorClass::Pointer,
    }
}

/// Resolves the topmost feature under a mouse event and updates the cursor.
///
/// Always queues and applies a style update, even when nothing is hit, so the
/// cursor falls back to [`CursorClass::None`] once the pointer leaves a feature.
pub fn locate_mouse<H>(
    host: &mut H,
    event: &PointerEvent,
    mode_name: Option<&str>,
) -> Option<FeatureDescriptor>
where
    H: FeatureQuery + UiSink + ?Sized,
{
    let target = host.query_mouse(event).into_iter().next();
    let classes = StyleClasses {
        mode: mode_name.map(str::to_string),
        mouse: Some(cursor_for(target.as_ref())),
        feature: target.as_ref().and_then(|f| f.meta.clone()),
    };
    trace!(
        "mouse target at ({:.1}, {:.1}): {:?}",
        event.point.x,
        event.point.y,
        target.as_ref().map(|f| f.id.as_str())
    );

    host.queue_style_classes(classes);
    host.apply_queued_style_classes();
    target
}

/// Resolves the topmost feature under a touch event. Touch has no cursor,
/// so the style sink is left alone.
pub fn locate_touch<H>(host: &H, event: &PointerEvent) -> Option<FeatureDescriptor>
where
    H: FeatureQuery + ?Sized,
{
    host.query_touch(event).into_iter().next()
}
