pub mod camera;
pub mod classify;
pub mod config;
pub mod correct;
pub mod detect;
pub mod http;
pub mod pipeline;
pub mod signs;

pub use camera::{
    CameraSource, DirectoryFrameSource, FrameEvent, FrameSource, FrameSourceFactory,
    FrameSupplyLoop, SourceState, SupplyConfig, VideoFrame,
};
pub use classify::{
    normalize_landmarks, CentroidModel, FeatureExtractor, NullExtractor, Prediction,
    SignClassifier, FEATURE_VECTOR_SIZE,
};
pub use config::Config;
pub use correct::{corrector_from_config, DisabledCorrector, OpenAiCorrector, TextCorrector};
pub use detect::{DetectorConfig, DetectorStats, SignDetector, StabilityFilter, StableSignal};
pub use http::{create_router, AppState};
pub use pipeline::DetectionPipeline;
