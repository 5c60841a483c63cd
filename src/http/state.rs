use crate::engine::Capability;
use crate::session::RecognitionSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active dictation sessions (session_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<RecognitionSession>>>>,

    /// Probed recognition capability, shared by every session
    pub capability: Capability,

    /// Language for sessions created without an explicit one
    pub default_language: String,
}

impl AppState {
    pub fn new(capability: Capability, default_language: String) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capability,
            default_language,
        }
    }
}
