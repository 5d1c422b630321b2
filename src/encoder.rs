//! Report encoding
//!
//! This module wraps session summaries and frame snapshots in a versioned
//! report envelope carrying producer metadata.

use crate::error::CounterError;
use crate::types::{FrameSnapshot, ReportProducer, SessionReport, SessionSummary};
use crate::{COUNTER_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "curl_counter.report.v1";

/// Encoder for session reports
pub struct SessionEncoder {
    instance_id: String,
}

impl Default for SessionEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Build the report envelope
    pub fn encode(&self, summary: &SessionSummary, frames: &[FrameSnapshot]) -> SessionReport {
        SessionReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: COUNTER_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            summary: summary.clone(),
            frames: frames.to_vec(),
        }
    }

    /// Encode to a JSON string
    pub fn encode_to_json(
        &self,
        summary: &SessionSummary,
        frames: &[FrameSnapshot],
    ) -> Result<String, CounterError> {
        let report = self.encode(summary, frames);
        Ok(serde_json::to_string(&report)?)
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json_pretty(
        &self,
        summary: &SessionSummary,
        frames: &[FrameSnapshot],
    ) -> Result<String, CounterError> {
        let report = self.encode(summary, frames);
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

/// One JSON line per snapshot, newline terminated
pub fn snapshots_to_ndjson(snapshots: &[FrameSnapshot]) -> Result<String, CounterError> {
    let mut out = String::new();
    for snapshot in snapshots {
        out.push_str(&serde_json::to_string(snapshot)?);
        out.push('\n');
    }
    Ok(out)
}
