use crate::classify::SignClassifier;
use crate::config::Config;
use crate::detect::SignDetector;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<Config>,

    /// The single detection session shared by all handlers
    pub detector: Arc<SignDetector>,

    /// Classifier model for the video feed pipeline
    pub classifier: Arc<dyn SignClassifier>,

    /// Exclusive permit for the camera device: only one video feed at a time
    pub feed_slot: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        detector: Arc<SignDetector>,
        classifier: Arc<dyn SignClassifier>,
    ) -> Self {
        Self {
            config,
            detector,
            classifier,
            feed_slot: Arc::new(Mutex::new(())),
        }
    }
}
