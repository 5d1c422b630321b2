//! Pose detector boundary
//!
//! The counter never looks at images. Anything that turns a frame into joint
//! positions implements [`PoseDetector`]; this module also resolves the
//! measured joint triplet out of a detection.

use crate::config::JointTriplet;
use crate::schema::{LandmarkAdapter, LandmarkFrame};
use crate::types::{JointId, JointPosition, Point};

/// Source of joint positions for a frame type `F`
pub trait PoseDetector<F> {
    /// Detect joints in `frame`; `None` or an empty list when nobody is visible
    fn detect(&mut self, frame: &F) -> Option<Vec<JointPosition>>;
}

impl<F, D> PoseDetector<F> for D
where
    D: FnMut(&F) -> Option<Vec<JointPosition>>,
{
    fn detect(&mut self, frame: &F) -> Option<Vec<JointPosition>> {
        self(frame)
    }
}

/// Detector that reads joints straight out of recorded landmark frames
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedDetector;

impl PoseDetector<LandmarkFrame> for RecordedDetector {
    fn detect(&mut self, frame: &LandmarkFrame) -> Option<Vec<JointPosition>> {
        let positions = LandmarkAdapter::to_positions(frame);
        if positions.is_empty() {
            None
        } else {
            Some(positions)
        }
    }
}

/// Why a detection could not produce the measured triplet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripletError {
    Missing(JointId),
    LowVisibility(JointId),
}

/// Points of the measured triplet, in `first, vertex, last` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripletPoints {
    pub first: Point,
    pub vertex: Point,
    pub last: Point,
}

/// Pick the triplet joints out of a detection.
///
/// When a joint is reported more than once the most visible report wins.
pub fn select_triplet(
    positions: &[JointPosition],
    triplet: &JointTriplet,
    min_visibility: Option<f64>,
) -> Result<TripletPoints, TripletError> {
    let resolve = |joint: JointId| -> Result<Point, TripletError> {
        let best = positions
            .iter()
            .filter(|p| p.joint == joint)
            .max_by(|a, b| {
                let va = a.visibility.unwrap_or(1.0);
                let vb = b.visibility.unwrap_or(1.0);
                va.total_cmp(&vb)
            })
            .ok_or(TripletError::Missing(joint))?;

        if let (Some(floor), Some(visibility)) = (min_visibility, best.visibility) {
            if visibility < floor {
                return Err(TripletError::LowVisibility(joint));
            }
        }
        Ok(best.point())
    };

    Ok(TripletPoints {
        first: resolve(triplet.first)?,
        vertex: resolve(triplet.vertex)?,
        last: resolve(triplet.last)?,
    })
}
