use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Reference data
        .route("/languages", get(handlers::list_languages))
        // Session lifecycle
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:session_id",
            get(handlers::get_session_status).delete(handlers::delete_session),
        )
        // Session control
        .route("/sessions/:session_id/start", post(handlers::start_session))
        .route("/sessions/:session_id/stop", post(handlers::stop_session))
        .route("/sessions/:session_id/reset", post(handlers::reset_session))
        .route("/sessions/:session_id/language", put(handlers::set_language))
        // Transcript queries and export
        .route(
            "/sessions/:session_id/transcript",
            get(handlers::get_transcript),
        )
        .route(
            "/sessions/:session_id/transcript/download",
            get(handlers::download_transcript),
        )
        // The host page is served from the browser; allow it to call us
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
