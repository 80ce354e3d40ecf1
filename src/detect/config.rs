use serde::{Deserialize, Serialize};

/// Tunables for sign stabilization and transcript assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Consecutive identical predictions required before a sign counts as stable
    pub stability_threshold: usize,

    /// Sliding window width for stability checking, in milliseconds
    pub stability_window_ms: u64,

    /// Minimum time between confirmed characters, in milliseconds
    ///
    /// Models "wait for the signer to move to the next letter": a held sign
    /// re-stabilizes every few frames, and without this delay each cycle
    /// would append another copy to the transcript.
    pub confirm_delay_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            stability_threshold: 5,
            stability_window_ms: 1000,
            confirm_delay_ms: 2000,
        }
    }
}
