//! Feature extraction and classification boundary
//!
//! The hand-landmark extractor and the classifier model are black boxes to
//! the detection pipeline; the traits here are the seam. The pipeline only
//! acts on feature vectors of exactly 42 values and only on the predicted
//! label, never on the confidence.

mod model;

pub use model::CentroidModel;

use crate::camera::VideoFrame;

/// 21 hand landmarks * 2 coordinates (x, y)
pub const FEATURE_VECTOR_SIZE: usize = 42;

/// A single classification result
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Recognized character (A-Z)
    pub character: char,
    /// Confidence percentage; informational only
    pub confidence: f32,
}

/// Extracts a normalized feature vector from a frame
///
/// Returns `None` when no hand is visible. Implementations wrap an external
/// landmark backend; `NullExtractor` stands in when none is configured.
pub trait FeatureExtractor: Send {
    fn extract(&mut self, frame: &VideoFrame) -> Option<Vec<f32>>;
}

/// Extractor used when no landmark backend is available
pub struct NullExtractor;

impl FeatureExtractor for NullExtractor {
    fn extract(&mut self, _frame: &VideoFrame) -> Option<Vec<f32>> {
        None
    }
}

/// Maps a feature vector to a character prediction
///
/// Returns `None` for vectors of the wrong length (silently discarded, not
/// an error) or when the model cannot produce a label.
pub trait SignClassifier: Send + Sync {
    fn predict(&self, features: &[f32]) -> Option<Prediction>;
}

/// Normalize raw (x, y) landmark coordinates into a feature vector
///
/// Shifts every coordinate by the per-axis minimum so the vector is
/// translation-invariant, matching how the training data was prepared.
pub fn normalize_landmarks(landmarks: &[(f32, f32)]) -> Vec<f32> {
    let min_x = landmarks
        .iter()
        .map(|&(x, _)| x)
        .fold(f32::INFINITY, f32::min);
    let min_y = landmarks
        .iter()
        .map(|&(_, y)| y)
        .fold(f32::INFINITY, f32::min);

    let mut features = Vec::with_capacity(landmarks.len() * 2);
    for &(x, y) in landmarks {
        features.push(x - min_x);
        features.push(y - min_y);
    }

    features
}
