use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a recognition session
///
/// Legal transitions: `Idle --start--> Listening --stop--> Stopped
/// --start--> Listening`; a language change forces `Stopped` from any state,
/// and reset returns to `Idle` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Listening,
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Listening => "listening",
            SessionState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Snapshot of a recognition session for status queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// Current lifecycle state
    pub state: SessionState,

    /// Currently configured language code
    pub language: String,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Seconds since the session was created
    pub duration_secs: f64,

    /// Number of finalized segments accumulated so far
    pub segments_count: usize,

    /// Transcript length in characters
    pub transcript_chars: usize,

    /// Current error string, if any (last-error semantics)
    pub error: Option<String>,
}
