//! pose.landmark_frame.v1 input schema
//!
//! This module defines the detector-agnostic input format used to replay
//! recorded pose detections through the counter, one frame per record.

mod adapter;
mod landmark_frame;

pub use adapter::*;
pub use landmark_frame::*;
