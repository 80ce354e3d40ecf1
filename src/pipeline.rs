//! Per-frame detection pipeline
//!
//! One sequential worker per video stream: pulls events from the frame
//! supply loop, runs feature extraction, classification, and stability
//! detection in arrival order, and yields MJPEG stream parts. Ordered,
//! single-threaded processing is load-bearing here: the stability rule is
//! defined over consecutive observations.

use crate::camera::{FrameEvent, FrameSupplyLoop, VideoFrame};
use crate::classify::{FeatureExtractor, SignClassifier, FEATURE_VECTOR_SIZE};
use crate::detect::SignDetector;
use axum::body::Bytes;
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// MJPEG multipart boundary, shared with the HTTP content-type header
pub const STREAM_BOUNDARY: &str = "frame";

pub struct DetectionPipeline {
    supply: FrameSupplyLoop,
    extractor: Box<dyn FeatureExtractor>,
    classifier: Arc<dyn SignClassifier>,
    detector: Arc<SignDetector>,
    placeholder: Option<Vec<u8>>,
    started: Instant,
}

impl DetectionPipeline {
    pub fn new(
        supply: FrameSupplyLoop,
        extractor: Box<dyn FeatureExtractor>,
        classifier: Arc<dyn SignClassifier>,
        detector: Arc<SignDetector>,
        placeholder: Option<Vec<u8>>,
    ) -> Self {
        Self {
            supply,
            extractor,
            classifier,
            detector,
            placeholder,
            started: Instant::now(),
        }
    }

    /// Produce the next MJPEG part, or `None` when the source is exhausted
    pub async fn next_part(&mut self) -> Option<Bytes> {
        match self.supply.next_event().await? {
            FrameEvent::Frame(frame) => {
                self.process_frame(&frame).await;
                Some(jpeg_part(&frame.jpeg, None))
            }
            FrameEvent::Unavailable { attempt, max } => {
                let status = format!("Camera not available. Retrying... ({}/{})", attempt, max);
                Some(jpeg_part(
                    self.placeholder.as_deref().unwrap_or(&[]),
                    Some(&status),
                ))
            }
            FrameEvent::Exhausted => {
                let status = "Camera permanently unavailable".to_string();
                Some(jpeg_part(
                    self.placeholder.as_deref().unwrap_or(&[]),
                    Some(&status),
                ))
            }
        }
    }

    async fn process_frame(&mut self, frame: &VideoFrame) {
        let features = match self.extractor.extract(frame) {
            Some(f) => f,
            None => return, // no hand visible
        };

        // Malformed vectors are discarded, not errors
        if features.len() != FEATURE_VECTOR_SIZE {
            return;
        }

        if let Some(prediction) = self.classifier.predict(&features) {
            debug!(
                "Frame {}: predicted {} ({:.2}%)",
                frame.sequence, prediction.character, prediction.confidence
            );
            let now_ms = self.started.elapsed().as_millis() as u64;
            self.detector.observe(prediction.character, now_ms).await;
        }
    }

    /// Adapt the pipeline into a body stream for the HTTP layer
    ///
    /// Dropping the stream (client disconnect) drops the pipeline and with
    /// it the supply loop, which releases the camera device.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, Infallible>> {
        futures::stream::unfold(self, |mut pipeline| async move {
            pipeline.next_part().await.map(|part| (Ok(part), pipeline))
        })
    }
}

/// Format one multipart/x-mixed-replace part
fn jpeg_part(jpeg: &[u8], camera_status: Option<&str>) -> Bytes {
    let mut part = Vec::with_capacity(jpeg.len() + 128);
    part.extend_from_slice(format!("--{}\r\n", STREAM_BOUNDARY).as_bytes());
    part.extend_from_slice(b"Content-Type: image/jpeg\r\n");
    if let Some(status) = camera_status {
        part.extend_from_slice(format!("X-Camera-Status: {}\r\n", status).as_bytes());
    }
    part.extend_from_slice(format!("Content-Length: {}\r\n\r\n", jpeg.len()).as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    Bytes::from(part)
}
