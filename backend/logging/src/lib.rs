//! Structured logging for Pokedex.
//!
//! Handles subscriber setup, log redaction, and per-request analysis events.

pub mod analysis_events;
pub mod logger;
pub mod redact;

pub use analysis_events::{AnalysisEvent, AnalysisEventLogger, EventLogEntry};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
