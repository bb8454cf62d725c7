//! Analysis Event Logger
//!
//! One structured record per upload outcome, emitted under the
//! `analysis_events` target so it can be routed to the NDJSON file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    UploadReceived {
        filename: String,
        mime_type: String,
        size_bytes: usize,
    },
    Completed {
        provider: String,
        model: String,
        latency_ms: u64,
        result_chars: usize,
    },
    Failed {
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Builds the log entry with free-text fields redacted.
    pub fn entry(request_id: &str, mut event: AnalysisEvent) -> EventLogEntry {
        match &mut event {
            AnalysisEvent::UploadReceived { filename, .. } => {
                *filename = redact_sensitive_data(filename);
            }
            AnalysisEvent::Failed { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            AnalysisEvent::Completed { .. } => {}
        }

        EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Logs an analysis event, redacting free-text fields first.
    pub fn log_event(request_id: &str, event: AnalysisEvent) {
        let entry = Self::entry(request_id, event);
        info!(target: "analysis_events", event = ?entry, "Analysis event");
    }
}
