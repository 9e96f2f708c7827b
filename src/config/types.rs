//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Click and tap recognition thresholds.
///
/// A pointer interaction is a click (or tap) only when it moves less than the
/// tolerance *and* lasts less than the interval. Touch input gets its own,
/// looser tolerance to absorb finger imprecision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GestureConfig {
    /// Maximum pointer travel in pixels for a click (valid range: 1.0 - 100.0)
    #[serde(default = "default_click_tolerance")]
    pub click_tolerance_px: f64,

    /// Maximum press duration in milliseconds for a click (valid range: 50 - 5000)
    #[serde(default = "default_click_interval")]
    pub click_interval_ms: u64,

    /// Maximum finger travel in pixels for a tap (valid range: 1.0 - 100.0)
    #[serde(default = "default_tap_tolerance")]
    pub tap_tolerance_px: f64,

    /// Maximum touch duration in milliseconds for a tap (valid range: 50 - 5000)
    #[serde(default = "default_tap_interval")]
    pub tap_interval_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_tolerance_px: default_click_tolerance(),
            click_interval_ms: default_click_interval(),
            tap_tolerance_px: default_tap_tolerance(),
            tap_interval_ms: default_tap_interval(),
        }
    }
}

/// Mode and input-source settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InteractionConfig {
    /// Mode entered when the editor starts
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Handle touch events; when false, touch input is ignored
    #[serde(default = "default_touch_enabled")]
    pub touch_enabled: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            touch_enabled: default_touch_enabled(),
        }
    }
}

/// Overlay style settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StyleConfig {
    /// Layer ids the editor adds to the map style. If any of them disappears
    /// after a style reload, all of them are re-added.
    #[serde(default = "default_overlay_layers")]
    pub overlay_layers: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            overlay_layers: default_overlay_layers(),
        }
    }
}

// =============================================================================
// Defaults
// =============================================================================

pub(crate) const DEFAULT_MODE: &str = "simple_select";

fn default_click_tolerance() -> f64 {
    12.0
}

fn default_click_interval() -> u64 {
    500
}

fn default_tap_tolerance() -> f64 {
    25.0
}

fn default_tap_interval() -> u64 {
    250
}

fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}

fn default_touch_enabled() -> bool {
    true
}

fn default_overlay_layers() -> Vec<String> {
    vec![
        "mapscriber-features.cold".to_string(),
        "mapscriber-features.hot".to_string(),
    ]
}
