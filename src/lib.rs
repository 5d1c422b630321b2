//! Curl Counter - pose-driven repetition counting for single-joint exercises
//!
//! Counts bicep curls (and similar exercises) from per-frame pose detections
//! through a deterministic pipeline: joint selection → angle estimation →
//! normalization → hysteresis counting.
//!
//! ## Modules
//!
//! - **Angle**: planar joint angle at a vertex landmark
//! - **Normalizer**: calibrated contraction percent and progress bar level
//! - **Counter**: two-phase half-rep state machine
//! - **Session**: per-stream orchestration, snapshots and summaries

pub mod angle;
pub mod config;
pub mod counter;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod normalizer;
pub mod rehearsal;
pub mod schema;
pub mod session;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use angle::{compute_angle, AngleEstimator, AngleReading};
pub use config::{ExerciseConfig, JointTriplet, Side};
pub use counter::{RepCounter, TriggerThresholds};
pub use detector::{PoseDetector, RecordedDetector};
pub use error::CounterError;
pub use normalizer::{BarScale, Calibration, Normalizer};
pub use rehearsal::{rehearse_curls, Rehearsal};
pub use session::{count_reps_ndjson, landmarks_to_snapshots, CurlSession};

// Schema exports
pub use schema::{LandmarkAdapter, LandmarkFrame, SCHEMA_VERSION};

/// Library version embedded in all reports
pub const COUNTER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "curl-counter";
