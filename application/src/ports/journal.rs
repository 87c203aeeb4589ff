//! Port for structured round journaling.
//!
//! Defines the [`RoundJournal`] trait for recording completed rounds to a
//! structured log. This is separate from `tracing`-based operation logs:
//! tracing handles human-readable diagnostics, while this port captures
//! round outcomes in a machine-readable format. Journal output is a pure
//! consumer of round results and never feeds back into decision logic.

use serde_json::Value;

/// A structured journal event.
///
/// Each event has a type string and a JSON payload with event-specific
/// fields; implementations stamp the record time themselves.
pub struct JournalEvent {
    /// Event type identifier (e.g., "round_completed", "candidate_evaluated")
    pub event_type: &'static str,
    /// JSON payload with event-specific data
    pub payload: Value,
}

impl JournalEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording round events to a structured journal.
///
/// The `record` method is intentionally synchronous and non-fallible so
/// journaling failures can never disrupt a round — they are silently
/// dropped by implementations.
pub trait RoundJournal: Send + Sync {
    fn record(&self, event: JournalEvent);
}

/// No-op implementation for tests and when journaling is disabled
pub struct NoJournal;

impl RoundJournal for NoJournal {
    fn record(&self, _event: JournalEvent) {}
}
