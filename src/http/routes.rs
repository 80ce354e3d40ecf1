use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/recording/start", post(handlers::start_recording))
        .route("/recording/stop", post(handlers::stop_recording))
        // Live detection queries
        .route("/prediction", get(handlers::get_prediction))
        .route("/status", get(handlers::get_status))
        // Camera stream with detection
        .route("/video_feed", get(handlers::video_feed))
        // Text to sign images
        .route("/convert_text", post(handlers::convert_text))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
