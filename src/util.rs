//! Utility types for screen-space geometry.
//!
//! This module provides:
//! - A screen-space [`Point`] shared by pointer and touch events
//! - Euclidean distance used by the gesture classifier

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Screen Coordinates
// ============================================================================

/// A point in screen pixels, relative to the map container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other` in pixels.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
