use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body (base64 clips are ~4/3 of the raw size)
pub const MAX_BODY_BYTES: usize = 256 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Wizard lifecycle
        .route("/interviews", post(handlers::create_interview))
        .route(
            "/interviews/:session_id",
            get(handlers::get_interview).delete(handlers::delete_interview),
        )
        // Navigation
        .route(
            "/interviews/:session_id/advance",
            post(handlers::advance_interview),
        )
        .route(
            "/interviews/:session_id/retreat",
            post(handlers::retreat_interview),
        )
        // Answers
        .route(
            "/interviews/:session_id/answers/:index",
            put(handlers::record_answer),
        )
        .route(
            "/interviews/:session_id/answers/:index/skip",
            post(handlers::skip_answer),
        )
        .route(
            "/interviews/:session_id/submit",
            post(handlers::submit_interview),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Browser clients post clips cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
