//! Error types for event dispatch.

use thiserror::Error;

/// Structured error types for listener failures.
///
/// The engine itself never fails while dispatching; these variants exist for
/// listeners (and plugins publishing custom events) to signal failure in a
/// structured way. During a dispatch pass all listeners run regardless of
/// failures, and the first error is surfaced to the caller of the write.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
    /// A listener reported a failure while handling an event
    #[error("Listener for '{kind}' events failed: {reason}")]
    ListenerFailed { kind: String, reason: String },
}

impl EventError {
    /// Check if this error came from a listener
    pub fn is_listener_error(&self) -> bool {
        matches!(self, EventError::ListenerFailed { .. })
    }

    /// Get the event kind associated with this error
    pub fn kind(&self) -> &str {
        match self {
            EventError::ListenerFailed { kind, .. } => kind,
        }
    }
}

impl From<EventError> for crate::Error {
    fn from(err: EventError) -> Self {
        crate::Error::Event(err)
    }
}
