//! Angle normalization
//!
//! This module maps a joint angle onto a contraction percentage and a progress
//! bar level.
//! - Angles are clamped to the calibrated range, never extrapolated
//! - Smaller angles mean more contraction unless the calibration is inverted
//! - Percent is always within 0-100

use crate::error::CounterError;
use serde::{Deserialize, Serialize};

/// Elbow angle at full contraction for a side-on bicep curl
pub const DEFAULT_ANGLE_MIN: f64 = 55.0;
/// Elbow angle at full extension for a side-on bicep curl
pub const DEFAULT_ANGLE_MAX: f64 = 145.0;

/// Expected physiological range of the measured joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Lower bound of the angle range (degrees)
    pub angle_min: f64,
    /// Upper bound of the angle range (degrees)
    pub angle_max: f64,
    /// Larger angles mean more contraction
    #[serde(default)]
    pub inverted: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            angle_min: DEFAULT_ANGLE_MIN,
            angle_max: DEFAULT_ANGLE_MAX,
            inverted: false,
        }
    }
}

impl Calibration {
    /// Create a validated calibration where `angle_min` is full contraction
    pub fn new(angle_min: f64, angle_max: f64) -> Result<Self, CounterError> {
        let calibration = Self {
            angle_min,
            angle_max,
            inverted: false,
        };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Create a validated calibration where `angle_max` is full contraction
    pub fn inverted(angle_min: f64, angle_max: f64) -> Result<Self, CounterError> {
        let calibration = Self {
            angle_min,
            angle_max,
            inverted: true,
        };
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn validate(&self) -> Result<(), CounterError> {
        if !self.angle_min.is_finite() || !self.angle_max.is_finite() {
            return Err(CounterError::InvalidCalibration(format!(
                "bounds must be finite (got {} and {})",
                self.angle_min, self.angle_max
            )));
        }
        if self.angle_min == self.angle_max {
            return Err(CounterError::InvalidCalibration(format!(
                "angle_min and angle_max are both {}",
                self.angle_min
            )));
        }
        if self.angle_min > self.angle_max {
            return Err(CounterError::InvalidCalibration(format!(
                "angle_min {} is above angle_max {}; set `inverted` to flip the mapping",
                self.angle_min, self.angle_max
            )));
        }
        Ok(())
    }

    /// Contraction percent for an angle, clamped to 0-100
    pub fn percent(&self, angle: f64) -> f64 {
        let clamped = angle.clamp(self.angle_min, self.angle_max);
        let extension = (clamped - self.angle_min) / (self.angle_max - self.angle_min);
        let percent = if self.inverted {
            extension * 100.0
        } else {
            (1.0 - extension) * 100.0
        };
        percent.clamp(0.0, 100.0)
    }
}

/// Pixel range of the on-screen progress bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarScale {
    /// Bar height at 0%
    pub empty_px: f64,
    /// Bar height at 100%
    pub full_px: f64,
}

impl Default for BarScale {
    fn default() -> Self {
        Self {
            empty_px: 50.0,
            full_px: 400.0,
        }
    }
}

impl BarScale {
    /// Bar level for a contraction percent
    pub fn level(&self, percent: f64) -> f64 {
        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        self.empty_px + fraction * (self.full_px - self.empty_px)
    }
}

/// Normalized view of one angle sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAngle {
    pub angle: f64,
    pub percent: f64,
    pub bar: f64,
}

/// Normalizer for converting angles into percent and bar levels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Normalizer {
    calibration: Calibration,
    bar: BarScale,
}

impl Normalizer {
    /// Create a normalizer, rejecting malformed calibrations
    pub fn new(calibration: Calibration, bar: BarScale) -> Result<Self, CounterError> {
        calibration.validate()?;
        Ok(Self { calibration, bar })
    }

    /// Normalize one angle sample
    pub fn normalize(&self, angle: f64) -> NormalizedAngle {
        let percent = self.calibration.percent(angle);
        NormalizedAngle {
            angle,
            percent,
            bar: self.bar.level(percent),
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
}
