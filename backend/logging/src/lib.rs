//! Structured logging for DefectScan.
//!
//! Handles log redaction, JSON file output with rotation, and analysis event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
