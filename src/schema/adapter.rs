//! Adapter for converting pose.landmark_frame.v1 records into joint positions
//!
//! Handles parsing recorded detector output (NDJSON or JSON arrays) and
//! scaling normalized coordinates into the pixel space the angle estimator
//! works in.

use crate::error::CounterError;
use crate::schema::landmark_frame::*;
use crate::types::JointPosition;

/// Adapter for converting landmark frames to joint positions
pub struct LandmarkAdapter;

impl LandmarkAdapter {
    /// Parse a JSON string containing an array of frames
    pub fn parse_array(json: &str) -> Result<Vec<LandmarkFrame>, CounterError> {
        let frames: Vec<LandmarkFrame> = serde_json::from_str(json)?;
        Ok(frames)
    }

    /// Parse NDJSON (newline-delimited JSON), one frame per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<LandmarkFrame>, CounterError> {
        let mut frames = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<LandmarkFrame>(trimmed) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    return Err(CounterError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(frames)
    }

    /// Parse a single NDJSON line and validate it
    pub fn parse_frame(line: &str) -> Result<LandmarkFrame, CounterError> {
        let frame: LandmarkFrame = serde_json::from_str(line.trim())?;
        frame
            .validate()
            .map_err(|e| CounterError::InvalidFrame(e.to_string()))?;
        Ok(frame)
    }

    /// Joint positions in pixel space.
    ///
    /// Normalized coordinates are scaled by the frame dimensions; depth is
    /// scaled by the width, matching how detectors report it.
    pub fn to_positions(frame: &LandmarkFrame) -> Vec<JointPosition> {
        let (sx, sy) = match (frame.normalized, frame.width, frame.height) {
            (true, Some(w), Some(h)) => (f64::from(w), f64::from(h)),
            _ => (1.0, 1.0),
        };

        frame
            .landmarks
            .iter()
            .map(|record| JointPosition {
                joint: record.joint,
                x: record.x * sx,
                y: record.y * sy,
                z: record.z.map(|z| z * sx),
                visibility: record.visibility,
            })
            .collect()
    }

    /// Validate a batch of frames
    pub fn validate_frames(frames: &[LandmarkFrame]) -> Vec<ValidationResult> {
        frames
            .iter()
            .enumerate()
            .map(|(idx, frame)| ValidationResult {
                index: idx,
                frame_index: frame.frame_index,
                result: frame.validate().err(),
            })
            .filter(|r| r.result.is_some())
            .collect()
    }
}

/// Result of frame validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub frame_index: Option<u64>,
    pub result: Option<ValidationError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JointId;

    #[test]
    fn test_parse_ndjson_skips_blank_lines() {
        let ndjson = r#"
{"frame_index": 0, "landmarks": []}

{"frame_index": 1, "landmarks": [{"joint": "right_elbow", "x": 1, "y": 2}]}
"#;
        let frames = LandmarkAdapter::parse_ndjson(ndjson).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].has_detection());
        assert!(frames[1].has_detection());
    }

    #[test]
    fn test_parse_ndjson_reports_line_number() {
        let ndjson = "{\"landmarks\": []}\nnot json\n";
        let err = LandmarkAdapter::parse_ndjson(ndjson).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[{"landmarks": []}, {"landmarks": []}]"#;
        assert_eq!(LandmarkAdapter::parse_array(json).unwrap().len(), 2);
        assert!(LandmarkAdapter::parse_array("{").is_err());
    }

    #[test]
    fn test_parse_frame_validates() {
        let line = r#"{"schema_version": "other.v1", "landmarks": []}"#;
        assert!(matches!(
            LandmarkAdapter::parse_frame(line),
            Err(CounterError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_normalized_coordinates_are_scaled() {
        let mut record = LandmarkRecord::new(JointId::RightWrist, 0.5, 0.25);
        record.z = Some(-0.125);
        let frame = LandmarkFrame::new(vec![record]).normalized_to(640, 480);

        let positions = LandmarkAdapter::to_positions(&frame);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].x, 320.0);
        assert_eq!(positions[0].y, 120.0);
        assert_eq!(positions[0].z, Some(-80.0));
    }

    #[test]
    fn test_pixel_coordinates_pass_through() {
        let frame = LandmarkFrame::new(vec![
            LandmarkRecord::new(JointId::RightWrist, 300.0, 360.0).with_visibility(0.6)
        ]);
        let positions = LandmarkAdapter::to_positions(&frame);
        assert_eq!(positions[0].x, 300.0);
        assert_eq!(positions[0].visibility, Some(0.6));
    }

    #[test]
    fn test_validate_frames_collects_failures() {
        let good = LandmarkFrame::empty().with_frame_index(0);
        let mut bad = LandmarkFrame::empty().with_frame_index(1);
        bad.normalized = true;

        let results = LandmarkAdapter::validate_frames(&[good, bad]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
        assert_eq!(results[0].frame_index, Some(1));
    }
}
