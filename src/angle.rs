//! Joint angle estimation
//!
//! Measures the angle at a vertex joint from the two limb segments that meet
//! there. The angle is direction sensitive: it is the counter-clockwise sweep
//! (in image coordinates) from the first segment to the second, so flexion and
//! hyperextension never alias to the same value.

use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Segments shorter than this (in pixels) are treated as coincident joints
pub const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// Angle at `vertex` between `first - vertex` and `last - vertex`, in degrees.
///
/// Returns a value in `[0, 360)`, or `None` when either segment is shorter than
/// [`MIN_SEGMENT_LENGTH`] or any coordinate is non-finite.
///
/// Swapping the outer joints reflects the result:
/// `compute_angle(c, b, a) == (360 - compute_angle(a, b, c)) % 360`.
pub fn compute_angle(first: Point, vertex: Point, last: Point) -> Option<f64> {
    if !(first.is_finite() && vertex.is_finite() && last.is_finite()) {
        return None;
    }

    let (ax, ay) = first.offset_from(vertex);
    let (cx, cy) = last.offset_from(vertex);

    if ax.hypot(ay) < MIN_SEGMENT_LENGTH || cx.hypot(cy) < MIN_SEGMENT_LENGTH {
        return None;
    }

    let mut degrees = (cy.atan2(cx) - ay.atan2(ax)).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // -tiny + 360 rounds to exactly 360
    if degrees >= 360.0 {
        degrees -= 360.0;
    }

    Some(degrees)
}

/// Result of one angle estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "degrees", rename_all = "snake_case")]
pub enum AngleReading {
    /// Measured from this frame's joints
    Measured(f64),
    /// Joints were degenerate; last measured angle repeated for display
    Held(f64),
    /// Joints were degenerate and nothing has been measured yet
    Unavailable,
}

impl AngleReading {
    /// Angle to display, measured or held
    pub fn degrees(&self) -> Option<f64> {
        match self {
            AngleReading::Measured(d) | AngleReading::Held(d) => Some(*d),
            AngleReading::Unavailable => None,
        }
    }

    /// Angle that may drive the counter
    pub fn measured(&self) -> Option<f64> {
        match self {
            AngleReading::Measured(d) => Some(*d),
            _ => None,
        }
    }
}

/// Angle estimator with a deterministic fallback for degenerate geometry
#[derive(Debug, Clone, Default)]
pub struct AngleEstimator {
    last_valid: Option<f64>,
}

impl AngleEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimate the angle at `vertex`, holding the last valid angle when the
    /// joints are degenerate
    pub fn estimate(&mut self, first: Point, vertex: Point, last: Point) -> AngleReading {
        match compute_angle(first, vertex, last) {
            Some(degrees) => {
                self.last_valid = Some(degrees);
                AngleReading::Measured(degrees)
            }
            None => match self.last_valid {
                Some(degrees) => AngleReading::Held(degrees),
                None => AngleReading::Unavailable,
            },
        }
    }

    pub fn last_valid(&self) -> Option<f64> {
        self.last_valid
    }
}
