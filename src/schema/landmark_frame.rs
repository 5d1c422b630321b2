//! pose.landmark_frame.v1 schema definition
//!
//! One record per video frame, carrying whatever the pose detector reported:
//! - Landmarks identified by name or detector index
//! - Pixel coordinates, or normalized coordinates plus frame dimensions
//! - Optional depth and visibility per landmark
//! - An empty landmark list for frames where nobody was detected

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::JointId;

/// Current schema version
pub const SCHEMA_VERSION: &str = "pose.landmark_frame.v1";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// One landmark as reported by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    /// Landmark name (`right_elbow`) or index (`14`)
    pub joint: JointId,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detector visibility (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl LandmarkRecord {
    pub fn new(joint: JointId, x: f64, y: f64) -> Self {
        Self {
            joint,
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// The main pose.landmark_frame.v1 record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Schema version identifier
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Frame sequence number from the capture source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<u64>,
    /// Capture timestamp (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Frame width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Frame height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Coordinates are fractions of width/height rather than pixels
    #[serde(default)]
    pub normalized: bool,
    /// Detected landmarks; empty when nobody was detected
    #[serde(default)]
    pub landmarks: Vec<LandmarkRecord>,
}

impl LandmarkFrame {
    /// Frame in pixel coordinates
    pub fn new(landmarks: Vec<LandmarkRecord>) -> Self {
        LandmarkFrame {
            schema_version: SCHEMA_VERSION.to_string(),
            frame_index: None,
            timestamp: None,
            width: None,
            height: None,
            normalized: false,
            landmarks,
        }
    }

    /// Frame where the detector found nobody
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_frame_index(mut self, frame_index: u64) -> Self {
        self.frame_index = Some(frame_index);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Mark coordinates as normalized to the given frame size
    pub fn normalized_to(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self.normalized = true;
        self
    }

    pub fn has_detection(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Validate the frame schema
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ValidationError::InvalidSchemaVersion {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        if self.normalized {
            match (self.width, self.height) {
                (Some(w), Some(h)) if w > 0 && h > 0 => {}
                _ => return Err(ValidationError::MissingDimensions),
            }
        }

        for record in &self.landmarks {
            let coords = [Some(record.x), Some(record.y), record.z];
            if coords.iter().flatten().any(|c| !c.is_finite()) {
                return Err(ValidationError::NonFiniteCoordinate {
                    joint: record.joint.as_str().to_string(),
                });
            }
            if let Some(visibility) = record.visibility {
                if !(0.0..=1.0).contains(&visibility) {
                    return Err(ValidationError::VisibilityOutOfRange {
                        joint: record.joint.as_str().to_string(),
                        value: visibility,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Validation errors for landmark frames
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Normalized coordinates require non-zero width and height")]
    MissingDimensions,

    #[error("Non-finite coordinate for joint {joint}")]
    NonFiniteCoordinate { joint: String },

    #[error("Visibility {value} for joint {joint} is outside 0-1")]
    VisibilityOutOfRange { joint: String, value: f64 },
}
