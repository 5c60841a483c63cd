//! HTTP API server for the transcript host (browser front end)
//!
//! This module provides a REST API for driving dictation sessions:
//! - POST /sessions - Create a session
//! - POST /sessions/:id/start - Begin listening
//! - POST /sessions/:id/stop - Stop listening
//! - POST /sessions/:id/reset - Clear transcript and error
//! - PUT /sessions/:id/language - Switch language
//! - GET /sessions/:id - Query session status
//! - GET /sessions/:id/transcript - Get accumulated transcript
//! - GET /sessions/:id/transcript/download - Export as transcript.txt
//! - DELETE /sessions/:id - Tear the session down
//! - GET /languages - Language catalog
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
