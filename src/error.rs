//! Error types for the curl counter

use thiserror::Error;

/// Errors raised while configuring a session or parsing landmark input.
///
/// Per-frame problems (no detection, degenerate geometry) are not errors; they
/// are reported through [`crate::types::FrameStatus`] with the count unchanged.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Invalid trigger thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Invalid exercise config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse landmark input: {0}")]
    ParseError(String),

    #[error("Invalid landmark frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
