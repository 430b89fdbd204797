//! Mapping of drag distance onto normalized progress.

use serde::Deserialize;

/// `clamp(|distance| / drag_threshold, 0, 1)`.
///
/// A non-positive or non-finite threshold maps everything to 0.
pub fn map_distance_to_progress(distance: f32, drag_threshold_px: f32) -> f32 {
    if !(drag_threshold_px.is_finite() && drag_threshold_px > 0.0) || distance.is_nan() {
        return 0.0;
    }
    (distance.abs() / drag_threshold_px).clamp(0.0, 1.0)
}

/// Compressive overscroll mapping used past a hard boundary.
///
/// The result is never positive and never below `-limit`: the further the
/// pointer travels, the less visual give it gets.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RubberBand {
    pub limit: f32,
    pub distance_px: f32,
}

impl Default for RubberBand {
    fn default() -> Self {
        Self {
            limit: 0.3,
            distance_px: 500.0,
        }
    }
}

impl RubberBand {
    pub fn progress(&self, distance: f32) -> f32 {
        if !(self.distance_px.is_finite() && self.distance_px > 0.0) || distance.is_nan() {
            return 0.0;
        }
        let limit = self.limit.max(0.0);
        -(distance.abs() / self.distance_px).min(limit)
    }
}
