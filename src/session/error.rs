use thiserror::Error;

use super::stats::SessionState;

/// Failures surfaced by a recognition session
///
/// Engine faults that arrive over the event stream are not errors in this
/// sense; they are reported through the session's error string and the
/// `Error` event. This type covers failures of caller-invoked operations.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The host offers no speech-recognition capability; fatal, no retry
    #[error("speech recognition is not available")]
    CapabilityUnavailable,

    /// The engine failed while carrying out an operation; recoverable by
    /// starting again
    #[error("recognition engine failure: {0}")]
    Engine(String),

    /// The operation is not legal in the current state
    #[error("cannot {op} while {state}")]
    InvalidState { op: &'static str, state: SessionState },

    /// The requested language is not in the catalog
    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    /// Export requested with nothing to export
    #[error("transcript is empty")]
    EmptyTranscript,
}
