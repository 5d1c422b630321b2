//! Session orchestration
//!
//! This module provides the public API for counting repetitions. A
//! [`CurlSession`] owns every piece of per-session state, so concurrent camera
//! streams each hold their own session with nothing shared between them.
//!
//! Per-frame stages:
//! 1. PoseDetector - joints for the frame (external)
//! 2. select_triplet - the three measured joints
//! 3. AngleEstimator - angle at the vertex joint
//! 4. Normalizer - contraction percent and bar level
//! 5. RepCounter - half-rep counting
//!
//! Frames are processed in arrival order. Samples that arrive out of order are
//! not reconciled and can produce a missed or spurious half count. A record
//! that does not parse or validate is a dropped frame, never an error.

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::angle::{AngleEstimator, AngleReading};
use crate::config::ExerciseConfig;
use crate::counter::RepCounter;
use crate::detector::{select_triplet, PoseDetector, TripletError};
use crate::encoder::SessionEncoder;
use crate::error::CounterError;
use crate::normalizer::{NormalizedAngle, Normalizer};
use crate::schema::{LandmarkAdapter, LandmarkFrame};
use crate::types::{
    CounterState, FrameSnapshot, FrameStatus, JointPosition, SessionSummary, Transition,
};

/// Consecutive dropped frames after which tracking is reported as lost
pub const LOST_TRACKING_FRAMES: u64 = 30;

/// Count repetitions in recorded landmark frames (NDJSON) and return the
/// session report JSON.
///
/// # Example
/// ```ignore
/// let report = count_reps_ndjson(landmarks_ndjson, ExerciseConfig::default())?;
/// ```
pub fn count_reps_ndjson(ndjson: String, config: ExerciseConfig) -> Result<String, CounterError> {
    let mut session = CurlSession::new(config)?;
    session.run_ndjson(&ndjson);

    SessionEncoder::new().encode_to_json(&session.summary(), &[])
}

/// Run recorded landmark frames (NDJSON) through a fresh session and return
/// one snapshot JSON per frame.
pub fn landmarks_to_snapshots(
    ndjson: String,
    config: ExerciseConfig,
) -> Result<Vec<String>, CounterError> {
    let mut session = CurlSession::new(config)?;
    let snapshots = session.run_ndjson(&ndjson);

    snapshots
        .iter()
        .map(|snapshot| serde_json::to_string(snapshot).map_err(CounterError::from))
        .collect()
}

/// One exercise session: the counting state machine plus everything needed to
/// feed it from raw detections.
#[derive(Debug, Clone)]
pub struct CurlSession {
    id: Uuid,
    config: ExerciseConfig,
    normalizer: Normalizer,
    estimator: AngleEstimator,
    /// Created on the first frame with a measured angle
    counter: Option<RepCounter>,
    started_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
    frames_processed: u64,
    frames_dropped: u64,
    consecutive_dropped: u64,
    transitions: u32,
    last_snapshot: Option<FrameSnapshot>,
}

impl CurlSession {
    /// Create a session, rejecting invalid configurations up front
    pub fn new(config: ExerciseConfig) -> Result<Self, CounterError> {
        config.validate()?;
        let normalizer = Normalizer::new(config.calibration, config.bar)?;

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            normalizer,
            estimator: AngleEstimator::new(),
            counter: None,
            started_at: None,
            updated_at: Utc::now(),
            frames_processed: 0,
            frames_dropped: 0,
            consecutive_dropped: 0,
            transitions: 0,
            last_snapshot: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    /// Counter state; the initial state until the first measured angle
    pub fn state(&self) -> CounterState {
        self.counter
            .as_ref()
            .map(RepCounter::state)
            .unwrap_or_default()
    }

    pub fn rep_count(&self) -> f64 {
        self.state().rep_count()
    }

    /// Whether the counter has started (first valid detection seen)
    pub fn is_started(&self) -> bool {
        self.counter.is_some()
    }

    /// Run a detector on `frame` and process its output
    pub fn process_frame<F, D>(&mut self, detector: &mut D, frame: &F) -> FrameSnapshot
    where
        D: PoseDetector<F> + ?Sized,
    {
        let detection = detector.detect(frame);
        self.process(detection.as_deref(), None)
    }

    /// Process one recorded landmark frame; frames failing validation are
    /// dropped as [`FrameStatus::InvalidFrame`]
    pub fn process_landmark_frame(&mut self, frame: &LandmarkFrame) -> FrameSnapshot {
        if let Err(e) = frame.validate() {
            warn!(
                session = %self.id,
                frame = ?frame.frame_index,
                error = %e,
                "Dropping invalid landmark frame"
            );
            return self.record(FrameStatus::InvalidFrame, None, None, frame.timestamp);
        }

        let positions = LandmarkAdapter::to_positions(frame);
        self.process(Some(positions.as_slice()), frame.timestamp)
    }

    /// Process one NDJSON landmark record
    pub fn process_line(&mut self, line: &str) -> FrameSnapshot {
        match LandmarkAdapter::parse_frame(line) {
            Ok(frame) => {
                let positions = LandmarkAdapter::to_positions(&frame);
                self.process(Some(positions.as_slice()), frame.timestamp)
            }
            Err(e) => {
                warn!(session = %self.id, error = %e, "Dropping unreadable landmark record");
                self.record(FrameStatus::InvalidFrame, None, None, None)
            }
        }
    }

    /// Process every non-blank NDJSON line in order
    pub fn run_ndjson(&mut self, ndjson: &str) -> Vec<FrameSnapshot> {
        ndjson
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.process_line(line))
            .collect()
    }

    /// Process one detection; `None` or an empty slice means nobody was found.
    ///
    /// Never fails: frames without a usable angle leave the count unchanged
    /// and report why through [`FrameSnapshot::status`].
    pub fn process_detection(&mut self, detection: Option<&[JointPosition]>) -> FrameSnapshot {
        self.process(detection, None)
    }

    /// Process every frame in order, returning one snapshot per frame
    pub fn run_frames(&mut self, frames: &[LandmarkFrame]) -> Vec<FrameSnapshot> {
        frames
            .iter()
            .map(|frame| self.process_landmark_frame(frame))
            .collect()
    }

    /// Latest snapshot, or the idle state before any frame
    pub fn snapshot(&self) -> FrameSnapshot {
        match &self.last_snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self.build_snapshot(0, None, FrameStatus::NoDetection, None, None),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.state();
        SessionSummary {
            session_id: self.id.to_string(),
            exercise: self.config.name.clone(),
            started_at: self.started_at,
            updated_at: self.updated_at,
            frames_processed: self.frames_processed,
            frames_dropped: self.frames_dropped,
            rep_count: state.rep_count(),
            display_count: state.display_count(),
            phase: state.phase,
            transitions: self.transitions,
        }
    }

    fn process(
        &mut self,
        detection: Option<&[JointPosition]>,
        timestamp: Option<DateTime<Utc>>,
    ) -> FrameSnapshot {
        let (status, normalized, transition) = match detection {
            None | Some([]) => (FrameStatus::NoDetection, None, None),
            Some(positions) => self.measure(positions),
        };
        self.record(status, normalized, transition, timestamp)
    }

    fn record(
        &mut self,
        status: FrameStatus,
        normalized: Option<NormalizedAngle>,
        transition: Option<Transition>,
        timestamp: Option<DateTime<Utc>>,
    ) -> FrameSnapshot {
        let frame_index = self.frames_processed;
        self.frames_processed += 1;
        self.updated_at = Utc::now();

        if status.is_dropped() {
            self.frames_dropped += 1;
            self.consecutive_dropped += 1;
            if self.consecutive_dropped == LOST_TRACKING_FRAMES {
                warn!(
                    session = %self.id,
                    frames = self.consecutive_dropped,
                    "Tracking lost, count held at {}",
                    self.rep_count()
                );
            }
        } else {
            self.consecutive_dropped = 0;
        }

        let snapshot = self.build_snapshot(frame_index, timestamp, status, normalized, transition);
        trace!(
            frame = frame_index,
            status = ?snapshot.status,
            percent = ?snapshot.percent,
            reps = snapshot.rep_count,
            "Frame processed"
        );

        self.last_snapshot = Some(snapshot.clone());
        snapshot
    }

    fn measure(
        &mut self,
        positions: &[JointPosition],
    ) -> (FrameStatus, Option<NormalizedAngle>, Option<Transition>) {
        let points = match select_triplet(positions, &self.config.joints, self.config.min_visibility)
        {
            Ok(points) => points,
            Err(TripletError::Missing(_)) => return (FrameStatus::MissingJoints, None, None),
            Err(TripletError::LowVisibility(_)) => return (FrameStatus::LowVisibility, None, None),
        };

        match self.estimator.estimate(points.first, points.vertex, points.last) {
            AngleReading::Measured(angle) => {
                let normalized = self.normalizer.normalize(angle);
                let transition = self.counter_mut().update(normalized.percent);
                if let Some(transition) = transition {
                    self.transitions += 1;
                    debug!(
                        session = %self.id,
                        ?transition,
                        reps = self.rep_count(),
                        "Half repetition completed"
                    );
                }
                (FrameStatus::Counted, Some(normalized), transition)
            }
            AngleReading::Held(angle) => (
                FrameStatus::DegenerateGeometry,
                Some(self.normalizer.normalize(angle)),
                None,
            ),
            AngleReading::Unavailable => (FrameStatus::DegenerateGeometry, None, None),
        }
    }

    fn counter_mut(&mut self) -> &mut RepCounter {
        if self.counter.is_none() {
            self.started_at = Some(Utc::now());
            debug!(session = %self.id, exercise = %self.config.name, "Session started");
        }
        // Thresholds were validated in `new`
        let thresholds = self.config.thresholds;
        self.counter
            .get_or_insert_with(|| RepCounter::from_validated(thresholds))
    }

    fn build_snapshot(
        &self,
        frame_index: u64,
        timestamp: Option<DateTime<Utc>>,
        status: FrameStatus,
        normalized: Option<NormalizedAngle>,
        transition: Option<Transition>,
    ) -> FrameSnapshot {
        let state = self.state();
        FrameSnapshot {
            frame_index,
            timestamp,
            status,
            angle: normalized.map(|n| n.angle),
            percent: normalized.map(|n| n.percent),
            bar: normalized.map(|n| n.bar),
            rep_count: state.rep_count(),
            display_count: state.display_count(),
            phase: state.phase,
            at_extreme: normalized
                .map(|n| self.config.thresholds.at_extreme(n.percent))
                .unwrap_or(false),
            transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Side;
    use crate::detector::RecordedDetector;
    use crate::rehearsal::arm_pose;
    use crate::schema::LandmarkRecord;
    use crate::types::{JointId, Phase};
    use pretty_assertions::assert_eq;

    const SHOULDER: (f64, f64) = (300.0, 100.0);
    const ELBOW: (f64, f64) = (300.0, 250.0);

    /// Right arm with the elbow at `angle` degrees, in the orientation the
    /// default calibration expects (upper arm straight up from the elbow,
    /// forearm swinging through +x).
    fn arm_at(angle: f64) -> Vec<JointPosition> {
        let theta = (angle - 90.0).to_radians();
        let forearm = 120.0;
        vec![
            JointPosition::new(JointId::RightShoulder, SHOULDER.0, SHOULDER.1),
            JointPosition::new(JointId::RightElbow, ELBOW.0, ELBOW.1),
            JointPosition::new(
                JointId::RightWrist,
                ELBOW.0 + forearm * theta.cos(),
                ELBOW.1 + forearm * theta.sin(),
            ),
        ]
    }

    fn frame_at(angle: f64) -> LandmarkFrame {
        LandmarkFrame::new(
            arm_at(angle)
                .into_iter()
                .map(|p| LandmarkRecord::new(p.joint, p.x, p.y))
                .collect(),
        )
    }

    fn session() -> CurlSession {
        CurlSession::new(ExerciseConfig::bicep_curl(Side::Right)).unwrap()
    }

    #[test]
    fn test_synthetic_arm_angle() {
        let mut s = session();
        for angle in [60.0, 100.0, 140.0] {
            let snapshot = s.process_detection(Some(arm_at(angle).as_slice()));
            assert!((snapshot.angle.unwrap() - angle).abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_curl_counts_one_rep() {
        let mut s = session();
        // 145° = extended (0%), 100° = 50%, 55° = contracted (100%)
        for angle in [145.0, 100.0, 55.0, 100.0, 145.0] {
            s.process_detection(Some(arm_at(angle).as_slice()));
        }

        let summary = s.summary();
        assert_eq!(summary.rep_count, 1.0);
        assert_eq!(summary.display_count, 1);
        assert_eq!(summary.phase, Phase::ExtendedWait);
        assert_eq!(summary.transitions, 2);
        assert_eq!(summary.frames_processed, 5);
        assert_eq!(summary.frames_dropped, 0);
    }

    #[test]
    fn test_half_rep_is_shown_truncated() {
        let mut s = session();
        s.process_detection(Some(arm_at(100.0).as_slice()));
        let snapshot = s.process_detection(Some(arm_at(40.0).as_slice()));

        assert_eq!(snapshot.transition, Some(Transition::Contracted));
        assert_eq!(snapshot.rep_count, 0.5);
        assert_eq!(snapshot.display_count, 0);
        assert_eq!(snapshot.percent, Some(100.0));
        assert!(snapshot.at_extreme);
    }

    #[test]
    fn test_missing_detection_keeps_state() {
        let angles = [145.0, 100.0, 55.0, 100.0, 145.0, 100.0, 55.0];

        let mut plain = session();
        for angle in angles {
            plain.process_detection(Some(arm_at(angle).as_slice()));
        }

        let mut interleaved = session();
        for angle in angles {
            interleaved.process_detection(None);
            interleaved.process_detection(Some(&[][..]));
            let snapshot = interleaved.process_detection(Some(arm_at(angle).as_slice()));
            assert_eq!(snapshot.status, FrameStatus::Counted);
            let dropped = interleaved.process_detection(None);
            assert_eq!(dropped.status, FrameStatus::NoDetection);
            assert_eq!(dropped.rep_count, snapshot.rep_count);
            assert_eq!(dropped.percent, None);
        }

        assert_eq!(interleaved.rep_count(), plain.rep_count());
        assert_eq!(interleaved.state(), plain.state());
        assert_eq!(interleaved.summary().frames_dropped, 21);
    }

    #[test]
    fn test_degenerate_geometry_holds_angle() {
        let mut s = session();
        s.process_detection(Some(arm_at(100.0).as_slice()));
        let before = s.state();

        let collapsed = vec![
            JointPosition::new(JointId::RightShoulder, 300.0, 250.0),
            JointPosition::new(JointId::RightElbow, 300.0, 250.0),
            JointPosition::new(JointId::RightWrist, 400.0, 250.0),
        ];
        let snapshot = s.process_detection(Some(collapsed.as_slice()));

        assert_eq!(snapshot.status, FrameStatus::DegenerateGeometry);
        assert!((snapshot.angle.unwrap() - 100.0).abs() < 1e-6);
        assert_eq!(snapshot.transition, None);
        assert_eq!(s.state(), before);
    }

    #[test]
    fn test_degenerate_before_first_angle() {
        let mut s = session();
        let collapsed = vec![
            JointPosition::new(JointId::RightShoulder, 1.0, 1.0),
            JointPosition::new(JointId::RightElbow, 1.0, 1.0),
            JointPosition::new(JointId::RightWrist, 1.0, 1.0),
        ];
        let snapshot = s.process_detection(Some(collapsed.as_slice()));
        assert_eq!(snapshot.status, FrameStatus::DegenerateGeometry);
        assert_eq!(snapshot.angle, None);
        assert!(!s.is_started());
    }

    #[test]
    fn test_counter_starts_on_first_measured_angle() {
        let mut s = session();
        s.process_detection(None);
        s.process_detection(Some(&arm_at(100.0)[..2]));
        assert!(!s.is_started());
        assert_eq!(s.summary().started_at, None);

        s.process_detection(Some(arm_at(100.0).as_slice()));
        assert!(s.is_started());
        assert!(s.summary().started_at.is_some());
    }

    #[test]
    fn test_missing_joint_status() {
        let mut s = session();
        let snapshot = s.process_detection(Some(&arm_at(100.0)[..2]));
        assert_eq!(snapshot.status, FrameStatus::MissingJoints);
        assert_eq!(snapshot.rep_count, 0.0);
    }

    #[test]
    fn test_low_visibility_status() {
        let mut config = ExerciseConfig::default();
        config.min_visibility = Some(0.5);
        let mut s = CurlSession::new(config).unwrap();

        let mut arm = arm_at(55.0);
        arm[2].visibility = Some(0.2);
        let snapshot = s.process_detection(Some(arm.as_slice()));
        assert_eq!(snapshot.status, FrameStatus::LowVisibility);
        assert_eq!(snapshot.rep_count, 0.0);
    }

    #[test]
    fn test_closure_detector() {
        let mut s = session();
        let mut detector = |angle: &Option<f64>| angle.map(arm_at);

        for angle in [Some(145.0), None, Some(55.0), None, Some(100.0), Some(145.0)] {
            s.process_frame(&mut detector, &angle);
        }
        assert_eq!(s.rep_count(), 1.0);
    }

    #[test]
    fn test_landmark_frames() {
        let mut s = session();
        let timestamp = Utc::now();
        let frames = vec![
            frame_at(145.0).with_timestamp(timestamp),
            LandmarkFrame::empty(),
            frame_at(55.0),
            frame_at(100.0),
            frame_at(145.0),
        ];

        let snapshots = s.run_frames(&frames);
        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[0].timestamp, Some(timestamp));
        assert_eq!(snapshots[1].status, FrameStatus::NoDetection);
        assert_eq!(snapshots[4].rep_count, 1.0);
        assert_eq!(
            snapshots.iter().map(|s| s.frame_index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_invalid_landmark_frame_is_dropped() {
        let mut s = session();
        s.run_frames(&[frame_at(145.0), frame_at(55.0)]);

        let mut frame = frame_at(100.0).with_timestamp(Utc::now());
        frame.normalized = true;
        let snapshot = s.process_landmark_frame(&frame);

        assert_eq!(snapshot.status, FrameStatus::InvalidFrame);
        assert_eq!(snapshot.timestamp, frame.timestamp);
        assert_eq!(snapshot.rep_count, 0.5);
        assert_eq!(snapshot.percent, None);
        assert_eq!(s.summary().frames_processed, 3);
        assert_eq!(s.summary().frames_dropped, 1);
    }

    #[test]
    fn test_invalid_record_keeps_counting() {
        let mut bad_visibility = frame_at(100.0);
        bad_visibility.landmarks[0].visibility = Some(1.02);

        let ndjson = [
            serde_json::to_string(&frame_at(145.0)).unwrap(),
            serde_json::to_string(&frame_at(55.0)).unwrap(),
            serde_json::to_string(&frame_at(100.0)).unwrap(),
            serde_json::to_string(&frame_at(145.0)).unwrap(),
            serde_json::to_string(&bad_visibility).unwrap(),
            "{\"landmarks\": [".to_string(),
            serde_json::to_string(&frame_at(100.0)).unwrap(),
            serde_json::to_string(&frame_at(55.0)).unwrap(),
        ]
        .join("\n");

        let mut s = session();
        let snapshots = s.run_ndjson(&ndjson);
        assert_eq!(snapshots.len(), 8);
        assert_eq!(snapshots[4].status, FrameStatus::InvalidFrame);
        assert_eq!(snapshots[5].status, FrameStatus::InvalidFrame);
        assert_eq!(snapshots[4].rep_count, 1.0);
        assert_eq!(s.rep_count(), 1.5);

        let report = count_reps_ndjson(ndjson, ExerciseConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["summary"]["rep_count"], 1.5);
        assert_eq!(value["summary"]["frames_dropped"], 2);
    }

    #[test]
    fn test_recorded_detector_matches_run_frames() {
        let frames = vec![
            frame_at(145.0),
            LandmarkFrame::empty(),
            frame_at(55.0),
            frame_at(100.0),
            LandmarkFrame::empty(),
            frame_at(145.0),
        ];

        let mut detected = session();
        let mut detector = RecordedDetector;
        let snapshots: Vec<FrameSnapshot> = frames
            .iter()
            .map(|frame| detected.process_frame(&mut detector, frame))
            .collect();

        assert_eq!(snapshots[1].status, FrameStatus::NoDetection);
        assert_eq!(snapshots[4].status, FrameStatus::NoDetection);

        let mut replayed = session();
        let expected = replayed.run_frames(&frames);
        assert_eq!(
            snapshots.iter().map(|s| (s.status, s.rep_count)).collect::<Vec<_>>(),
            expected.iter().map(|s| (s.status, s.rep_count)).collect::<Vec<_>>()
        );
        assert_eq!(detected.state(), replayed.state());
        assert_eq!(detected.rep_count(), 1.0);
    }

    #[test]
    fn test_left_arm_preset_counts_mirrored_curl() {
        let mut left = CurlSession::new(ExerciseConfig::bicep_curl(Side::Left)).unwrap();
        let mut right = session();

        for _ in 0..2 {
            for angle in [145.0, 100.0, 55.0, 100.0, 145.0] {
                let snapshot = left.process_detection(Some(arm_pose(Side::Left, angle).as_slice()));
                assert!((snapshot.angle.unwrap() - angle).abs() < 1e-6);
                right.process_detection(Some(arm_pose(Side::Right, angle).as_slice()));
            }
        }

        assert_eq!(left.rep_count(), 2.0);
        assert_eq!(left.state(), right.state());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = session();
        let mut b = session();
        for angle in [145.0, 55.0, 100.0, 145.0] {
            a.process_detection(Some(arm_at(angle).as_slice()));
        }
        b.process_detection(Some(arm_at(100.0).as_slice()));

        assert_eq!(a.rep_count(), 1.0);
        assert_eq!(b.rep_count(), 0.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ExerciseConfig::default();
        config.calibration.angle_max = config.calibration.angle_min;
        assert!(matches!(
            CurlSession::new(config),
            Err(CounterError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_snapshot_before_any_frame() {
        let s = session();
        let snapshot = s.snapshot();
        assert_eq!(snapshot.rep_count, 0.0);
        assert_eq!(snapshot.phase, Phase::ExtendedWait);
        assert_eq!(snapshot.percent, None);
    }

    #[test]
    fn test_count_reps_ndjson() {
        let ndjson: String = [145.0, 100.0, 55.0, 100.0, 145.0, 100.0, 55.0]
            .iter()
            .map(|a| serde_json::to_string(&frame_at(*a)).unwrap() + "\n")
            .collect();

        let report = count_reps_ndjson(ndjson.clone(), ExerciseConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["summary"]["rep_count"], 1.5);
        assert_eq!(value["summary"]["display_count"], 1);
        assert_eq!(value["summary"]["phase"], "contracted_wait");

        let snapshots = landmarks_to_snapshots(ndjson, ExerciseConfig::default()).unwrap();
        assert_eq!(snapshots.len(), 7);
        assert!(snapshots[2].contains("\"transition\":\"contracted\""));
    }

    #[test]
    fn test_count_reps_unreadable_input() {
        let report = count_reps_ndjson("nope\n\nnope".to_string(), ExerciseConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["summary"]["frames_processed"], 2);
        assert_eq!(value["summary"]["frames_dropped"], 2);
        assert_eq!(value["summary"]["rep_count"], 0.0);

        let mut config = ExerciseConfig::default();
        config.calibration.angle_min = 200.0;
        assert!(matches!(
            count_reps_ndjson(String::new(), config),
            Err(CounterError::InvalidCalibration(_))
        ));
    }
}
