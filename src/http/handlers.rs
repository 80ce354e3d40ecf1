use super::state::AppState;
use crate::camera::{FrameSourceFactory, FrameSupplyLoop};
use crate::classify::NullExtractor;
use crate::pipeline::{DetectionPipeline, STREAM_BOUNDARY};
use crate::signs::{self, SignImage};
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Maximum accepted input length for text-to-sign conversion
const MAX_TEXT_LENGTH: usize = 500;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub correction_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub status: String,
    pub raw_text: String,
    pub corrected_text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ConvertTextResponse {
    pub status: String,
    pub images: Vec<SignImage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            // The process refuses to start without a model
            model_loaded: true,
            correction_enabled: !state.config.correction.api_key.is_empty(),
        }),
    )
}

/// POST /recording/start
/// Begin accumulating confirmed characters into a fresh transcript
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.detector.start().await;

    (
        StatusCode::OK,
        Json(StartRecordingResponse {
            status: "success".to_string(),
            message: "Recording started".to_string(),
        }),
    )
}

/// POST /recording/stop
/// Stop recording and return the raw and corrected transcript
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    let (raw_text, corrected_text) = state.detector.stop().await;

    (
        StatusCode::OK,
        Json(StopRecordingResponse {
            status: "success".to_string(),
            raw_text,
            corrected_text,
        }),
    )
}

/// GET /prediction
/// Currently stable character (live display polls this)
pub async fn get_prediction(State(state): State<AppState>) -> impl IntoResponse {
    let prediction = state.detector.current_stable().await;
    (StatusCode::OK, Json(PredictionResponse { prediction }))
}

/// GET /status
/// Full session snapshot
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.detector.stats().await;
    (StatusCode::OK, Json(stats))
}

/// GET /video_feed
/// MJPEG stream of camera frames with live sign detection
pub async fn video_feed(State(state): State<AppState>) -> Response {
    // The camera is exclusively owned by one feed at a time
    let permit = match state.feed_slot.clone().try_lock_owned() {
        Ok(p) => p,
        Err(_) => {
            warn!("Rejected video feed request: feed already active");
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "A video feed is already active".to_string(),
                }),
            )
                .into_response();
        }
    };

    let source = match FrameSourceFactory::create(
        state.config.camera_source(),
        Duration::from_millis(state.config.camera.frame_interval_ms),
    ) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create frame source: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create frame source: {}", e),
                }),
            )
                .into_response();
        }
    };

    let placeholder = state
        .config
        .camera
        .placeholder_image
        .as_ref()
        .and_then(|path| match signs::load_placeholder(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Placeholder image unavailable: {}", e);
                None
            }
        });

    let supply = FrameSupplyLoop::new(source, state.config.supply_config());
    let pipeline = DetectionPipeline::new(
        supply,
        Box::new(NullExtractor),
        state.classifier.clone(),
        state.detector.clone(),
        placeholder,
    );

    info!("Video feed started");

    // The permit rides along with the stream and is released on disconnect
    let stream = pipeline
        .into_stream()
        .map(move |item| {
            let _permit = &permit;
            item
        });

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={}", STREAM_BOUNDARY),
        )
        .body(Body::from_stream(stream))
        .unwrap_or_else(|e| {
            error!("Failed to build stream response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

/// POST /convert_text
/// Convert input text to sign language images
pub async fn convert_text(
    State(state): State<AppState>,
    Json(req): Json<ConvertTextRequest>,
) -> impl IntoResponse {
    let text = req.text.trim();

    if text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No text provided. Please enter some text to convert.".to_string(),
            }),
        )
            .into_response();
    }

    if text.len() > MAX_TEXT_LENGTH {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "Text too long. Maximum {} characters allowed.",
                    MAX_TEXT_LENGTH
                ),
            }),
        )
            .into_response();
    }

    // Only letters and spaces map to sign images
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();

    if filtered.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Please enter English letters only (A-Z).".to_string(),
            }),
        )
            .into_response();
    }

    let images = signs::text_to_sign(&state.config.signs.letter_images_dir, &filtered);
    info!("Converted text to sign: {}", filtered);

    (
        StatusCode::OK,
        Json(ConvertTextResponse {
            status: "success".to_string(),
            images,
        }),
    )
        .into_response()
}
