use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the detection session for status queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorStats {
    /// Session identifier
    pub session_id: String,

    /// Whether recording is currently active
    pub is_recording: bool,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Characters confirmed into the transcript so far
    pub transcript: Vec<char>,

    /// Currently stable character (empty if none yet)
    pub current_stable: String,

    /// Corrected sentence from the last stopped recording (empty if none)
    pub corrected_sentence: String,
}
