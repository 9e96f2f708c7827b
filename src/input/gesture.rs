//! Click and tap recognition from gesture start/end snapshots.
//!
//! Both classifiers are pure: they compare the distance between two points and
//! the time between two timestamps against [`GestureThresholds`]. A gesture is
//! a click (or tap) only when it is below *both* thresholds; anything else is a
//! drag. A missing start snapshot never counts as a click or tap.

use crate::config::GestureConfig;
use crate::util::Point;

/// Position and timestamp captured at a gesture boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSnapshot {
    pub point: Point,
    /// Milliseconds, on the same clock as the event stream
    pub time: u64,
}

impl PointSnapshot {
    pub const fn new(point: Point, time: u64) -> Self {
        Self { point, time }
    }
}

/// Runtime thresholds for click and tap recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub click_tolerance: f64,
    pub click_interval_ms: u64,
    pub tap_tolerance: f64,
    pub tap_interval_ms: u64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::from(&GestureConfig::default())
    }
}

impl From<&GestureConfig> for GestureThresholds {
    fn from(cfg: &GestureConfig) -> Self {
        Self {
            click_tolerance: cfg.click_tolerance_px,
            click_interval_ms: cfg.click_interval_ms,
            tap_tolerance: cfg.tap_tolerance_px,
            tap_interval_ms: cfg.tap_interval_ms,
        }
    }
}

fn within(
    start: Option<&PointSnapshot>,
    end: &PointSnapshot,
    tolerance: f64,
    interval_ms: u64,
) -> bool {
    let Some(start) = start else {
        return false;
    };
    let distance = start.point.distance(&end.point);
    let elapsed = end.time.saturating_sub(start.time);
    distance < tolerance && elapsed < interval_ms
}

/// Whether a mouse press/release pair counts as a click.
pub fn is_click(
    start: Option<&PointSnapshot>,
    end: &PointSnapshot,
    thresholds: &GestureThresholds,
) -> bool {
    within(
        start,
        end,
        thresholds.click_tolerance,
        thresholds.click_interval_ms,
    )
}

/// Whether a touch start/end pair counts as a tap.
pub fn is_tap(
    start: Option<&PointSnapshot>,
    end: &PointSnapshot,
    thresholds: &GestureThresholds,
) -> bool {
    within(
        start,
        end,
        thresholds.tap_tolerance,
        thresholds.tap_interval_ms,
    )
}
