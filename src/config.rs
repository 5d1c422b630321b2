//! Exercise configuration
//!
//! Selects the joint triplet that forms the measured angle, the calibrated
//! angle range, the trigger bands and the renderer bar scale. Configurations
//! are plain JSON so they can be stored next to recorded landmark files.

use crate::counter::TriggerThresholds;
use crate::error::CounterError;
use crate::normalizer::{BarScale, Calibration};
use crate::types::JointId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Body side facing the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Three joints forming the measured angle; `vertex` is where it is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointTriplet {
    pub first: JointId,
    pub vertex: JointId,
    pub last: JointId,
}

impl JointTriplet {
    /// Elbow angle of one arm seen from its own side.
    ///
    /// The angle is direction sensitive, so the left arm (the mirror image of
    /// the right) lists its outer joints wrist first. Both arms then read the
    /// same angle for the same elbow bend.
    pub fn arm(side: Side) -> Self {
        match side {
            Side::Left => Self {
                first: JointId::LeftWrist,
                vertex: JointId::LeftElbow,
                last: JointId::LeftShoulder,
            },
            Side::Right => Self {
                first: JointId::RightShoulder,
                vertex: JointId::RightElbow,
                last: JointId::RightWrist,
            },
        }
    }

    pub fn joints(&self) -> [JointId; 3] {
        [self.first, self.vertex, self.last]
    }

    fn is_distinct(&self) -> bool {
        self.first != self.vertex && self.vertex != self.last && self.first != self.last
    }
}

/// Full configuration for one exercise session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    /// Exercise name carried into summaries
    pub name: String,
    pub joints: JointTriplet,
    #[serde(default)]
    pub calibration: Calibration,
    #[serde(default)]
    pub thresholds: TriggerThresholds,
    #[serde(default)]
    pub bar: BarScale,
    /// Joints reported below this visibility are ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_visibility: Option<f64>,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self::bicep_curl(Side::Right)
    }
}

impl ExerciseConfig {
    /// Side-on bicep curl measured at the elbow
    pub fn bicep_curl(side: Side) -> Self {
        Self {
            name: format!("bicep_curl_{}", side.as_str()),
            joints: JointTriplet::arm(side),
            calibration: Calibration::default(),
            thresholds: TriggerThresholds::default(),
            bar: BarScale::default(),
            min_visibility: None,
        }
    }

    /// Check every section; called before a session is created
    pub fn validate(&self) -> Result<(), CounterError> {
        if self.name.trim().is_empty() {
            return Err(CounterError::InvalidConfig(
                "exercise name must not be empty".to_string(),
            ));
        }
        if !self.joints.is_distinct() {
            return Err(CounterError::InvalidConfig(format!(
                "joint triplet must name three different joints (got {}, {}, {})",
                self.joints.first, self.joints.vertex, self.joints.last
            )));
        }
        self.calibration.validate()?;
        self.thresholds.validate()?;

        if !self.bar.empty_px.is_finite() || !self.bar.full_px.is_finite() {
            return Err(CounterError::InvalidConfig(
                "bar scale must be finite".to_string(),
            ));
        }
        if let Some(floor) = self.min_visibility {
            if !(0.0..=1.0).contains(&floor) {
                return Err(CounterError::InvalidConfig(format!(
                    "min_visibility must be within 0-1 (got {})",
                    floor
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, CounterError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CounterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, CounterError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), CounterError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_right_arm_curl() {
        let config = ExerciseConfig::default();
        assert_eq!(config.name, "bicep_curl_right");
        assert_eq!(
            config.joints.joints().map(|j| j.index()),
            [12, 14, 16]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_left_arm_preset() {
        let config = ExerciseConfig::bicep_curl(Side::Left);
        assert_eq!(config.joints.joints().map(|j| j.index()), [15, 13, 11]);
        assert_eq!(config.calibration, Calibration::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = ExerciseConfig::bicep_curl(Side::Left);
        config.min_visibility = Some(0.5);
        let json = config.to_json().unwrap();
        let parsed = ExerciseConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "name": "hammer_curl",
            "joints": { "first": 12, "vertex": "right_elbow", "last": 16 }
        }"#;
        let config = ExerciseConfig::from_json(json).unwrap();
        assert_eq!(config.calibration, Calibration::default());
        assert_eq!(config.thresholds, TriggerThresholds::default());
        assert_eq!(config.joints, JointTriplet::arm(Side::Right));
    }

    #[test]
    fn test_rejects_equal_calibration_bounds() {
        let json = r#"{
            "name": "broken",
            "joints": { "first": 12, "vertex": 14, "last": 16 },
            "calibration": { "angle_min": 90.0, "angle_max": 90.0 }
        }"#;
        assert!(matches!(
            ExerciseConfig::from_json(json),
            Err(CounterError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_rejects_repeated_joints() {
        let mut config = ExerciseConfig::default();
        config.joints.last = JointId::RightElbow;
        assert!(matches!(
            config.validate(),
            Err(CounterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_visibility_floor_out_of_range() {
        let mut config = ExerciseConfig::default();
        config.min_visibility = Some(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("curl-counter-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("config.json");

        let config = ExerciseConfig::bicep_curl(Side::Left);
        config.save(&path).unwrap();
        let loaded = ExerciseConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let result = ExerciseConfig::load(Path::new("/nonexistent/curl-counter/config.json"));
        assert!(matches!(result, Err(CounterError::Io(_))));
    }
}
