//! Synthetic curl rehearsal
//!
//! Drives a configuration through scripted side-on curls performed by both
//! arms at once, each arm seen from its own side (the left arm is the mirror
//! image of the right). A configuration whose joint order or calibration does
//! not match the way the arm is filmed counts nothing here.

use serde::{Deserialize, Serialize};

use crate::config::{ExerciseConfig, Side};
use crate::error::CounterError;
use crate::session::CurlSession;
use crate::types::{FrameStatus, JointId, JointPosition};

const UPPER_ARM_PX: f64 = 150.0;
const FOREARM_PX: f64 = 120.0;
const RIGHT_ELBOW: (f64, f64) = (400.0, 250.0);
const LEFT_ELBOW: (f64, f64) = (200.0, 250.0);

/// Interior elbow angles of one curl: extended, contracted, extended again
pub const CURL_SWEEP: [f64; 9] = [170.0, 145.0, 120.0, 90.0, 40.0, 90.0, 120.0, 145.0, 170.0];

/// Shoulder, elbow and wrist of one arm bent to `interior_angle` degrees.
///
/// The upper arm points straight up from the elbow and the forearm swings
/// forward: toward +x for the right arm, toward -x for the left.
pub fn arm_pose(side: Side, interior_angle: f64) -> Vec<JointPosition> {
    let (elbow, forward, [shoulder_id, elbow_id, wrist_id]) = match side {
        Side::Right => (
            RIGHT_ELBOW,
            1.0,
            [JointId::RightShoulder, JointId::RightElbow, JointId::RightWrist],
        ),
        Side::Left => (
            LEFT_ELBOW,
            -1.0,
            [JointId::LeftShoulder, JointId::LeftElbow, JointId::LeftWrist],
        ),
    };
    let bend = interior_angle.to_radians();

    vec![
        JointPosition::new(shoulder_id, elbow.0, elbow.1 - UPPER_ARM_PX),
        JointPosition::new(elbow_id, elbow.0, elbow.1),
        JointPosition::new(
            wrist_id,
            elbow.0 + forward * FOREARM_PX * bend.sin(),
            elbow.1 - FOREARM_PX * bend.cos(),
        ),
    ]
}

/// Both arms bent to the same angle
pub fn both_arms_pose(interior_angle: f64) -> Vec<JointPosition> {
    let mut pose = arm_pose(Side::Right, interior_angle);
    pose.extend(arm_pose(Side::Left, interior_angle));
    pose
}

/// Outcome of a rehearsal run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rehearsal {
    /// Curls performed
    pub curls: u32,
    /// Repetitions the counter reported
    pub rep_count: f64,
    /// Frames where the configured joints were found
    pub frames_measured: u64,
    pub percent_min: Option<f64>,
    pub percent_max: Option<f64>,
}

impl Rehearsal {
    /// Every curl was counted
    pub fn counts_every_curl(&self) -> bool {
        self.rep_count == f64::from(self.curls)
    }

    /// False when the configured joints are not arm joints
    pub fn is_applicable(&self) -> bool {
        self.frames_measured > 0
    }
}

/// Run `curls` scripted curls through a fresh session for `config`
pub fn rehearse_curls(config: &ExerciseConfig, curls: u32) -> Result<Rehearsal, CounterError> {
    let mut session = CurlSession::new(config.clone())?;
    let mut frames_measured = 0;
    let mut range: Option<(f64, f64)> = None;

    for _ in 0..curls {
        for angle in CURL_SWEEP {
            let snapshot = session.process_detection(Some(both_arms_pose(angle).as_slice()));
            if snapshot.status == FrameStatus::Counted {
                frames_measured += 1;
            }
            if let Some(percent) = snapshot.percent {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(percent), hi.max(percent)),
                    None => (percent, percent),
                });
            }
        }
    }

    Ok(Rehearsal {
        curls,
        rep_count: session.rep_count(),
        frames_measured,
        percent_min: range.map(|(lo, _)| lo),
        percent_max: range.map(|(_, hi)| hi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::compute_angle;
    use crate::config::JointTriplet;
    use crate::normalizer::Calibration;

    fn interior(pose: &[JointPosition]) -> f64 {
        let upper = pose[0].point().offset_from(pose[1].point());
        let fore = pose[2].point().offset_from(pose[1].point());
        let cos = (upper.0 * fore.0 + upper.1 * fore.1)
            / (upper.0.hypot(upper.1) * fore.0.hypot(fore.1));
        cos.clamp(-1.0, 1.0).acos().to_degrees()
    }

    #[test]
    fn test_arm_pose_interior_angle() {
        for side in [Side::Right, Side::Left] {
            for angle in [40.0, 90.0, 145.0] {
                assert!((interior(&arm_pose(side, angle)) - angle).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_left_arm_is_mirrored() {
        let right = arm_pose(Side::Right, 55.0);
        let left = arm_pose(Side::Left, 55.0);
        let forward = |pose: &[JointPosition]| pose[2].x - pose[1].x;
        assert!(forward(&right) > 0.0);
        assert!(forward(&left) < 0.0);

        // Shoulder first, the mirror reads the reflected angle
        let reflected = compute_angle(left[0].point(), left[1].point(), left[2].point()).unwrap();
        assert!((reflected - 305.0).abs() < 1e-9);
    }

    #[test]
    fn test_presets_count_every_curl() {
        for side in [Side::Right, Side::Left] {
            let rehearsal = rehearse_curls(&ExerciseConfig::bicep_curl(side), 2).unwrap();
            assert_eq!(rehearsal.rep_count, 2.0, "{:?} arm", side);
            assert!(rehearsal.counts_every_curl());
            assert_eq!(rehearsal.percent_min, Some(0.0));
            assert_eq!(rehearsal.percent_max, Some(100.0));
        }
    }

    #[test]
    fn test_shoulder_first_left_arm_never_counts() {
        let mut config = ExerciseConfig::bicep_curl(Side::Left);
        config.joints = JointTriplet {
            first: JointId::LeftShoulder,
            vertex: JointId::LeftElbow,
            last: JointId::LeftWrist,
        };

        let rehearsal = rehearse_curls(&config, 2).unwrap();
        assert!(rehearsal.is_applicable());
        assert!(!rehearsal.counts_every_curl());
        assert_eq!(rehearsal.rep_count, 0.0);
        assert_eq!(rehearsal.percent_max, Some(0.0));

        // The reflected range works once the mapping is inverted
        config.calibration = Calibration::inverted(215.0, 305.0).unwrap();
        assert!(rehearse_curls(&config, 2).unwrap().counts_every_curl());
    }

    #[test]
    fn test_non_arm_joints_are_not_applicable() {
        let mut config = ExerciseConfig::default();
        config.joints = JointTriplet {
            first: JointId::LeftHip,
            vertex: JointId::LeftKnee,
            last: JointId::LeftAnkle,
        };

        let rehearsal = rehearse_curls(&config, 1).unwrap();
        assert!(!rehearsal.is_applicable());
        assert_eq!(rehearsal.percent_min, None);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = ExerciseConfig::default();
        config.thresholds.extended = 100.0;
        assert!(rehearse_curls(&config, 1).is_err());
    }
}
