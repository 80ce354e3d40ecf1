// End-to-end tests for the detection pipeline
//
// A scripted frame source plus fake extractor/classifier drive the full
// chain: supply loop -> feature extraction -> classification -> stability ->
// transcript, with MJPEG parts coming out the other side.

use anyhow::{bail, Result};
use signstream::{
    DetectionPipeline, DetectorConfig, FeatureExtractor, FrameSource, FrameSupplyLoop, Prediction,
    SignClassifier, SignDetector, SupplyConfig, TextCorrector, VideoFrame, FEATURE_VECTOR_SIZE,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

struct EchoCorrector;

#[async_trait::async_trait]
impl TextCorrector for EchoCorrector {
    async fn correct(&self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }
}

/// Source that serves a fixed number of frames, then fails its reads
struct CountingSource {
    remaining: u32,
    sequence: u64,
    open: bool,
}

#[async_trait::async_trait]
impl FrameSource for CountingSource {
    async fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<VideoFrame> {
        if self.remaining == 0 {
            bail!("no frames left");
        }
        self.remaining -= 1;
        let frame = VideoFrame {
            jpeg: vec![0xAB; 16],
            timestamp_ms: self.sequence * 33,
            sequence: self.sequence,
        };
        self.sequence += 1;
        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Extractor that replays a script of per-frame feature vectors
struct ScriptedExtractor {
    script: VecDeque<Option<Vec<f32>>>,
}

impl FeatureExtractor for ScriptedExtractor {
    fn extract(&mut self, _frame: &VideoFrame) -> Option<Vec<f32>> {
        self.script.pop_front().flatten()
    }
}

/// Classifier keyed on the first feature value
struct ByFirstValue;

impl SignClassifier for ByFirstValue {
    fn predict(&self, features: &[f32]) -> Option<Prediction> {
        if features.len() != FEATURE_VECTOR_SIZE {
            return None;
        }
        let character = (b'A' + features[0] as u8) as char;
        Some(Prediction {
            character,
            confidence: 99.0,
        })
    }
}

fn features_for(index: u8) -> Option<Vec<f32>> {
    let mut v = vec![0.0; FEATURE_VECTOR_SIZE];
    v[0] = index as f32;
    Some(v)
}

fn fast_config() -> SupplyConfig {
    SupplyConfig {
        max_read_failures: 2,
        max_reconnect_attempts: 1,
        reconnect_backoff: Duration::from_millis(1),
        read_retry_delay: Duration::from_millis(1),
    }
}

fn detector() -> Arc<SignDetector> {
    Arc::new(SignDetector::new(
        DetectorConfig {
            stability_threshold: 3,
            stability_window_ms: 60_000,
            confirm_delay_ms: 0,
        },
        Arc::new(EchoCorrector),
    ))
}

#[tokio::test]
async fn test_frames_flow_through_to_transcript() {
    let supply = FrameSupplyLoop::new(
        Box::new(CountingSource {
            remaining: 5,
            sequence: 0,
            open: false,
        }),
        fast_config(),
    );

    // Three hands classified as 'A', then one misread, then no hand
    let extractor = ScriptedExtractor {
        script: VecDeque::from(vec![
            features_for(0),
            features_for(0),
            features_for(0),
            features_for(1),
            None,
        ]),
    };

    let detector = detector();
    detector.start().await;

    let mut pipeline = DetectionPipeline::new(
        supply,
        Box::new(extractor),
        Arc::new(ByFirstValue),
        detector.clone(),
        None,
    );

    let mut frames = 0;
    while let Some(part) = pipeline.next_part().await {
        let text = String::from_utf8_lossy(&part[..60.min(part.len())]).to_string();
        if !text.contains("X-Camera-Status") {
            frames += 1;
        }
        if frames == 5 {
            break;
        }
    }
    assert_eq!(frames, 5);

    // 'A' stabilized after three identical observations and was confirmed
    let (raw, corrected) = detector.stop().await;
    assert_eq!(raw, "A");
    assert_eq!(corrected, "A");
}

#[tokio::test]
async fn test_wrong_length_features_are_discarded() {
    let supply = FrameSupplyLoop::new(
        Box::new(CountingSource {
            remaining: 3,
            sequence: 0,
            open: false,
        }),
        fast_config(),
    );

    let extractor = ScriptedExtractor {
        script: VecDeque::from(vec![
            Some(vec![0.0; 10]),
            Some(vec![0.0; 10]),
            Some(vec![0.0; 10]),
        ]),
    };

    let detector = detector();
    detector.start().await;

    let mut pipeline = DetectionPipeline::new(
        supply,
        Box::new(extractor),
        Arc::new(ByFirstValue),
        detector.clone(),
        None,
    );

    for _ in 0..3 {
        pipeline.next_part().await.unwrap();
    }

    let (raw, _) = detector.stop().await;
    assert_eq!(raw, "");
}

#[tokio::test]
async fn test_mjpeg_part_format() {
    let supply = FrameSupplyLoop::new(
        Box::new(CountingSource {
            remaining: 1,
            sequence: 0,
            open: false,
        }),
        fast_config(),
    );

    let mut pipeline = DetectionPipeline::new(
        supply,
        Box::new(ScriptedExtractor {
            script: VecDeque::new(),
        }),
        Arc::new(ByFirstValue),
        detector(),
        None,
    );

    let part = pipeline.next_part().await.unwrap();
    let text = String::from_utf8_lossy(&part);
    assert!(text.starts_with("--frame\r\n"));
    assert!(text.contains("Content-Type: image/jpeg\r\n"));
    assert!(text.contains("Content-Length: 16\r\n"));
    assert!(text.ends_with("\r\n"));
}

#[tokio::test]
async fn test_exhausted_source_ends_the_stream() {
    // Source opens but every read fails; with one reconnect cycle allowed the
    // stream surfaces a terminal status part and then ends
    let supply = FrameSupplyLoop::new(
        Box::new(CountingSource {
            remaining: 0,
            sequence: 0,
            open: false,
        }),
        fast_config(),
    );

    let mut pipeline = DetectionPipeline::new(
        supply,
        Box::new(ScriptedExtractor {
            script: VecDeque::new(),
        }),
        Arc::new(ByFirstValue),
        detector(),
        None,
    );

    let part = pipeline.next_part().await.unwrap();
    let text = String::from_utf8_lossy(&part);
    assert!(text.contains("X-Camera-Status: Camera permanently unavailable"));

    assert!(pipeline.next_part().await.is_none());
}
