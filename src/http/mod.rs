//! HTTP API server for the translator UI
//!
//! This module provides a REST API plus the MJPEG camera stream:
//! - POST /recording/start - Start accumulating a transcript
//! - POST /recording/stop - Stop and return raw/corrected text
//! - GET /prediction - Currently stable character
//! - GET /status - Session snapshot
//! - GET /video_feed - MJPEG stream with live detection
//! - POST /convert_text - Letters to fingerspelling images
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
