//! Sign stabilization and transcript assembly
//!
//! This module provides the `SignDetector` abstraction that manages:
//! - Stability filtering of the raw per-frame prediction stream
//! - Recording on/off state and the accumulated transcript
//! - Debounced confirmation of newly stabilized characters
//! - Best-effort sentence correction on stop

mod config;
mod detector;
mod stability;
mod stats;

pub use config::DetectorConfig;
pub use detector::SignDetector;
pub use stability::{StabilityFilter, StableSignal};
pub use stats::DetectorStats;
