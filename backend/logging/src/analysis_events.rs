//! Analysis Event Logger
//!
//! One structured record per lifecycle step of an analysis request, emitted
//! under the `analysis_events` target so they can be filtered separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    Received {
        size_bytes: usize,
        mime_type: String,
    },
    Rejected {
        reason: String,
    },
    Completed {
        provider: String,
        model: String,
        latency_ms: u64,
        text_chars: usize,
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

pub struct AnalysisEventLogger;

impl AnalysisEventLogger {
    /// Build the entry that [`log_event`](Self::log_event) emits, with secrets scrubbed.
    pub fn entry(request_id: &str, mut event: AnalysisEvent) -> EventLogEntry {
        if let AnalysisEvent::Failed { error_msg } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(request_id: &str, event: AnalysisEvent) {
        let entry = Self::entry(request_id, event);
        match &entry.event {
            AnalysisEvent::Failed { .. } => {
                warn!(target: "analysis_events", event = ?entry, "Analysis event")
            }
            _ => info!(target: "analysis_events", event = ?entry, "Analysis event"),
        }
    }
}
