use super::{Prediction, SignClassifier, FEATURE_VECTOR_SIZE};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Serialized model file layout
#[derive(Debug, Deserialize)]
struct ModelFile {
    labels: Vec<char>,
    centroids: Vec<Vec<f32>>,
}

/// Nearest-centroid sign classifier
///
/// Loads per-letter feature centroids from a JSON model file and predicts
/// the label of the closest centroid. Confidence is derived from the
/// distance gap to the runner-up.
pub struct CentroidModel {
    labels: Vec<char>,
    centroids: Vec<Vec<f32>>,
}

impl CentroidModel {
    /// Load a model from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading model from: {:?}", path);

        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read model file: {:?}", path))?;
        let file: ModelFile =
            serde_json::from_slice(&data).context("Model file is not valid JSON")?;

        if file.labels.len() != file.centroids.len() {
            bail!(
                "Model file is inconsistent: {} labels but {} centroids",
                file.labels.len(),
                file.centroids.len()
            );
        }
        for centroid in &file.centroids {
            if centroid.len() != FEATURE_VECTOR_SIZE {
                bail!(
                    "Model centroid has {} values, expected {}",
                    centroid.len(),
                    FEATURE_VECTOR_SIZE
                );
            }
        }

        info!("Model loaded: {} labels", file.labels.len());

        Ok(Self {
            labels: file.labels,
            centroids: file.centroids,
        })
    }

    fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }
}

impl SignClassifier for CentroidModel {
    fn predict(&self, features: &[f32]) -> Option<Prediction> {
        if features.len() != FEATURE_VECTOR_SIZE || self.labels.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        let mut runner_up = f32::INFINITY;

        for (i, centroid) in self.centroids.iter().enumerate() {
            let dist = Self::squared_distance(features, centroid);
            match best {
                None => best = Some((i, dist)),
                Some((_, best_dist)) if dist < best_dist => {
                    runner_up = best_dist;
                    best = Some((i, dist));
                }
                Some(_) => {
                    if dist < runner_up {
                        runner_up = dist;
                    }
                }
            }
        }

        let (index, dist) = best?;
        let character = self.labels[index].to_ascii_uppercase();

        // Single-label models have no runner-up to compare against
        let confidence = if runner_up.is_finite() && runner_up > 0.0 {
            (1.0 - dist / runner_up).clamp(0.0, 1.0) * 100.0
        } else {
            100.0
        };

        Some(Prediction {
            character,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(labels: Vec<char>, centroids: Vec<Vec<f32>>) -> CentroidModel {
        CentroidModel { labels, centroids }
    }

    fn features(value: f32) -> Vec<f32> {
        vec![value; FEATURE_VECTOR_SIZE]
    }

    #[test]
    fn test_predicts_nearest_centroid() {
        let m = model(vec!['a', 'b'], vec![features(0.0), features(1.0)]);

        let near_a = m.predict(&features(0.1)).unwrap();
        assert_eq!(near_a.character, 'A');

        let near_b = m.predict(&features(0.9)).unwrap();
        assert_eq!(near_b.character, 'B');
    }

    #[test]
    fn test_labels_are_uppercased() {
        let m = model(vec!['q'], vec![features(0.0)]);
        assert_eq!(m.predict(&features(0.0)).unwrap().character, 'Q');
    }

    #[test]
    fn test_wrong_length_vector_is_discarded() {
        let m = model(vec!['a'], vec![features(0.0)]);
        assert!(m.predict(&[0.0; 10]).is_none());
        assert!(m.predict(&[]).is_none());
    }

    #[test]
    fn test_confidence_reflects_margin() {
        let m = model(vec!['a', 'b'], vec![features(0.0), features(1.0)]);

        let clear = m.predict(&features(0.01)).unwrap();
        let ambiguous = m.predict(&features(0.49)).unwrap();
        assert!(clear.confidence > ambiguous.confidence);
    }
}
