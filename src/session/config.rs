use serde::{Deserialize, Serialize};

use crate::language::DEFAULT_LANGUAGE;

/// Configuration for a recognition session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g. "session-2026-08-07-notes")
    pub session_id: String,

    /// Initial dictation language (must be in the catalog)
    pub language: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }
}
