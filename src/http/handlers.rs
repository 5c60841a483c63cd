use super::state::AppState;
use crate::export::transcript_download;
use crate::language;
use crate::session::{RecognitionSession, SessionConfig, SessionError, SessionState};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,

    /// Optional language code (default taken from service configuration)
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: SessionState,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub transcript: String,
    pub segments: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Map a session error onto an HTTP status
fn session_error_status(error: &SessionError) -> StatusCode {
    match error {
        SessionError::CapabilityUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::InvalidState { .. } => StatusCode::CONFLICT,
        SessionError::UnknownLanguage(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::EmptyTranscript => StatusCode::CONFLICT,
        SessionError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn not_found(session_id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("Session {} not found", session_id),
    )
}

async fn find_session(state: &AppState, session_id: &str) -> Option<Arc<RecognitionSession>> {
    let sessions = state.sessions.read().await;
    sessions.get(session_id).cloned()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions
/// Create a new dictation session
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    // Generate or use provided session ID
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("session-{}", uuid::Uuid::new_v4()));

    let lang = req.language.unwrap_or_else(|| state.default_language.clone());

    info!("Creating dictation session: {} ({})", session_id, lang);

    // Check for a duplicate ID
    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&session_id) {
            return error_response(
                StatusCode::CONFLICT,
                format!("Session {} already exists", session_id),
            );
        }
    }

    let config = SessionConfig {
        session_id: session_id.clone(),
        language: lang,
    };

    let session = match RecognitionSession::new(config, state.capability.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create session: {}", e);
            return error_response(session_error_status(&e), format!("{}", e));
        }
    };

    let response = SessionResponse {
        session_id: session.session_id().to_string(),
        state: session.state().await,
        language: session.language().await,
    };

    // Store session
    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id, session);
    }

    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /sessions/:session_id/start
/// Begin listening
pub async fn start_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = find_session(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match session.start().await {
        Ok(()) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        Err(e) => {
            error!("Failed to start session {}: {}", session_id, e);
            error_response(session_error_status(&e), format!("{}", e))
        }
    }
}

/// POST /sessions/:session_id/stop
/// Stop listening (idempotent)
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = find_session(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match session.stop().await {
        Ok(()) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        Err(e) => {
            error!("Failed to stop session {}: {}", session_id, e);
            error_response(session_error_status(&e), format!("{}", e))
        }
    }
}

/// POST /sessions/:session_id/reset
/// Clear the transcript and error, return to idle
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = find_session(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match session.reset().await {
        Ok(()) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        Err(e) => {
            error!("Failed to reset session {}: {}", session_id, e);
            error_response(session_error_status(&e), format!("{}", e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageRequest {
    pub language: String,
}

/// PUT /sessions/:session_id/language
/// Switch language (rebuilds the engine handle, clears the transcript)
pub async fn set_language(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SetLanguageRequest>,
) -> impl IntoResponse {
    let Some(session) = find_session(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match session.set_language(&req.language).await {
        Ok(()) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        Err(e) => {
            error!(
                "Failed to set language {} on session {}: {}",
                req.language, session_id, e
            );
            error_response(session_error_status(&e), format!("{}", e))
        }
    }
}

/// GET /sessions/:session_id
/// Get status of a dictation session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match find_session(&state, &session_id).await {
        Some(session) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        None => not_found(&session_id),
    }
}

/// DELETE /sessions/:session_id
/// Tear the session down and release its engine handle
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    match session {
        Some(session) => {
            session.shutdown().await;
            info!("Deleted session {}", session_id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /sessions/:session_id/transcript
/// Get the transcript accumulated so far (finalized segments only)
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = find_session(&state, &session_id).await else {
        return not_found(&session_id);
    };

    let stats = session.stats().await;
    (
        StatusCode::OK,
        Json(TranscriptResponse {
            session_id,
            transcript: session.transcript().await,
            segments: stats.segments_count,
        }),
    )
        .into_response()
}

/// GET /sessions/:session_id/transcript/download
/// Export the transcript as an attachment (refused while empty)
pub async fn download_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = find_session(&state, &session_id).await else {
        return not_found(&session_id);
    };

    let transcript = session.transcript().await;
    match transcript_download(&transcript) {
        Ok(download) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, download.mime_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.filename),
                ),
            ],
            download.content,
        )
            .into_response(),
        Err(e) => error_response(session_error_status(&e), format!("{}", e)),
    }
}

/// GET /languages
/// The language catalog, in display order
pub async fn list_languages() -> impl IntoResponse {
    (StatusCode::OK, Json(language::LANGUAGES))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
