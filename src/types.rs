//! Core types for the curl counter pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! per-frame pipeline: joint positions from the detector, counter state, and the
//! snapshots and summaries handed to the renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Skeletal landmark identifier (33-point BlazePose topology)
///
/// The discriminant is the landmark index reported by the pose detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "JointRepr")]
#[repr(u8)]
pub enum JointId {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl JointId {
    /// All landmarks in index order
    pub const ALL: [JointId; 33] = [
        JointId::Nose,
        JointId::LeftEyeInner,
        JointId::LeftEye,
        JointId::LeftEyeOuter,
        JointId::RightEyeInner,
        JointId::RightEye,
        JointId::RightEyeOuter,
        JointId::LeftEar,
        JointId::RightEar,
        JointId::MouthLeft,
        JointId::MouthRight,
        JointId::LeftShoulder,
        JointId::RightShoulder,
        JointId::LeftElbow,
        JointId::RightElbow,
        JointId::LeftWrist,
        JointId::RightWrist,
        JointId::LeftPinky,
        JointId::RightPinky,
        JointId::LeftIndex,
        JointId::RightIndex,
        JointId::LeftThumb,
        JointId::RightThumb,
        JointId::LeftHip,
        JointId::RightHip,
        JointId::LeftKnee,
        JointId::RightKnee,
        JointId::LeftAnkle,
        JointId::RightAnkle,
        JointId::LeftHeel,
        JointId::RightHeel,
        JointId::LeftFootIndex,
        JointId::RightFootIndex,
    ];

    /// Landmark index as reported by the detector
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Look up a landmark by detector index
    pub fn from_index(index: u8) -> Option<JointId> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JointId::Nose => "nose",
            JointId::LeftEyeInner => "left_eye_inner",
            JointId::LeftEye => "left_eye",
            JointId::LeftEyeOuter => "left_eye_outer",
            JointId::RightEyeInner => "right_eye_inner",
            JointId::RightEye => "right_eye",
            JointId::RightEyeOuter => "right_eye_outer",
            JointId::LeftEar => "left_ear",
            JointId::RightEar => "right_ear",
            JointId::MouthLeft => "mouth_left",
            JointId::MouthRight => "mouth_right",
            JointId::LeftShoulder => "left_shoulder",
            JointId::RightShoulder => "right_shoulder",
            JointId::LeftElbow => "left_elbow",
            JointId::RightElbow => "right_elbow",
            JointId::LeftWrist => "left_wrist",
            JointId::RightWrist => "right_wrist",
            JointId::LeftPinky => "left_pinky",
            JointId::RightPinky => "right_pinky",
            JointId::LeftIndex => "left_index",
            JointId::RightIndex => "right_index",
            JointId::LeftThumb => "left_thumb",
            JointId::RightThumb => "right_thumb",
            JointId::LeftHip => "left_hip",
            JointId::RightHip => "right_hip",
            JointId::LeftKnee => "left_knee",
            JointId::RightKnee => "right_knee",
            JointId::LeftAnkle => "left_ankle",
            JointId::RightAnkle => "right_ankle",
            JointId::LeftHeel => "left_heel",
            JointId::RightHeel => "right_heel",
            JointId::LeftFootIndex => "left_foot_index",
            JointId::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointId::ALL
            .iter()
            .find(|joint| joint.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown joint name '{}'", s))
    }
}

/// Wire representation: detectors emit either a landmark index or a name
#[derive(Deserialize)]
#[serde(untagged)]
enum JointRepr {
    Index(u8),
    Name(String),
}

impl TryFrom<JointRepr> for JointId {
    type Error = String;

    fn try_from(repr: JointRepr) -> Result<Self, Self::Error> {
        match repr {
            JointRepr::Index(index) => JointId::from_index(index)
                .ok_or_else(|| format!("unknown joint index {}", index)),
            JointRepr::Name(name) => name.parse(),
        }
    }
}

/// 2D pixel coordinate (origin top-left, x right, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to this point
    pub fn offset_from(&self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected joint for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    /// Which landmark this is
    pub joint: JointId,
    /// Pixel x coordinate
    pub x: f64,
    /// Pixel y coordinate
    pub y: f64,
    /// Relative depth, when the detector provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detector visibility/confidence (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl JointPosition {
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

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Counter phase (the `direction` flag of the counting state machine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Was extended, waiting to fully contract (direction 0)
    #[default]
    ExtendedWait,
    /// Was contracted, waiting to fully extend (direction 1)
    ContractedWait,
}

impl Phase {
    pub fn direction(&self) -> u8 {
        match self {
            Phase::ExtendedWait => 0,
            Phase::ContractedWait => 1,
        }
    }
}

/// Half-cycle completed on a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Full contraction reached from the extended phase
    Contracted,
    /// Full extension reached from the contracted phase
    Extended,
}

/// Counting state for one exercise session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Completed half-cycles; the rep count is half of this
    pub half_reps: u32,
    /// Current phase
    pub phase: Phase,
    /// Whether the next extreme crossing may count
    pub armed: bool,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            half_reps: 0,
            phase: Phase::ExtendedWait,
            armed: true,
        }
    }
}

impl CounterState {
    /// Repetition count in steps of 0.5
    pub fn rep_count(&self) -> f64 {
        f64::from(self.half_reps) / 2.0
    }

    /// Integer part of the rep count, as shown on screen
    pub fn display_count(&self) -> u32 {
        self.half_reps / 2
    }
}

/// What happened to a frame on its way through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    /// Angle measured and fed to the counter
    Counted,
    /// Detector found no person
    NoDetection,
    /// Detection lacked one of the measured joints
    MissingJoints,
    /// A measured joint was below the visibility floor
    LowVisibility,
    /// Coincident joints, angle undefined
    DegenerateGeometry,
    /// Landmark record did not parse or failed schema validation
    InvalidFrame,
}

impl FrameStatus {
    /// True when the frame carried no usable angle
    pub fn is_dropped(&self) -> bool {
        !matches!(self, FrameStatus::Counted)
    }
}

/// Read-only per-frame state for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Sequence number within the session
    pub frame_index: u64,
    /// Capture time, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub status: FrameStatus,
    /// Elbow angle in degrees; the last valid angle on degenerate frames
    pub angle: Option<f64>,
    /// Contraction percent (0-100)
    pub percent: Option<f64>,
    /// Progress bar level in pixels
    pub bar: Option<f64>,
    pub rep_count: f64,
    pub display_count: u32,
    pub phase: Phase,
    /// Percent is inside a trigger band
    pub at_extreme: bool,
    /// Half-cycle completed on this frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub exercise: String,
    /// First frame with a measured angle
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub frames_processed: u64,
    /// Frames that did not reach the counter
    pub frames_dropped: u64,
    pub rep_count: f64,
    pub display_count: u32,
    pub phase: Phase,
    pub transitions: u32,
}

/// Producer metadata embedded in every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Versioned report envelope around a session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub summary: SessionSummary,
    /// Per-frame snapshots, when requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<FrameSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_index_roundtrip() {
        for joint in JointId::ALL {
            assert_eq!(JointId::from_index(joint.index()), Some(joint));
        }
        assert_eq!(JointId::RightShoulder.index(), 12);
        assert_eq!(JointId::RightElbow.index(), 14);
        assert_eq!(JointId::RightWrist.index(), 16);
        assert_eq!(JointId::from_index(33), None);
    }

    #[test]
    fn test_joint_deserialize_name_or_index() {
        let by_name: JointId = serde_json::from_str("\"left_elbow\"").unwrap();
        let by_index: JointId = serde_json::from_str("13").unwrap();
        assert_eq!(by_name, JointId::LeftElbow);
        assert_eq!(by_index, JointId::LeftElbow);

        assert!(serde_json::from_str::<JointId>("\"left_antenna\"").is_err());
        assert!(serde_json::from_str::<JointId>("99").is_err());
    }

    #[test]
    fn test_joint_serializes_as_name() {
        let json = serde_json::to_string(&JointId::RightFootIndex).unwrap();
        assert_eq!(json, "\"right_foot_index\"");
    }

    #[test]
    fn test_counter_state_counts_in_halves() {
        let state = CounterState {
            half_reps: 5,
            phase: Phase::ContractedWait,
            armed: false,
        };
        assert_eq!(state.rep_count(), 2.5);
        assert_eq!(state.display_count(), 2);
        assert_eq!(state.phase.direction(), 1);
    }
}
