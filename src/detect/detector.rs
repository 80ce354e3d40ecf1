use super::config::DetectorConfig;
use super::stability::StabilityFilter;
use super::stats::DetectorStats;
use crate::correct::TextCorrector;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Mutable session state, guarded by one mutex
///
/// Mutated only by the frame-processing worker and the start/stop control
/// calls; status queries take read-only snapshots.
struct DetectorState {
    stability: StabilityFilter,
    transcript: Vec<char>,
    last_confirmed_char: Option<char>,
    last_confirmed_at_ms: Option<u64>,
    current_stable: Option<char>,
    corrected_sentence: String,
}

/// Sign detection session
///
/// Turns the raw per-frame prediction stream into a debounced character
/// stream and, while recording, an accumulated transcript. Stopping a
/// recording hands the raw spaced-letter text to the text-correction
/// collaborator; correction is best-effort and degrades to the raw text.
pub struct SignDetector {
    session_id: String,
    config: DetectorConfig,
    corrector: Arc<dyn TextCorrector>,
    started_at: chrono::DateTime<chrono::Utc>,
    is_recording: Arc<AtomicBool>,
    state: Mutex<DetectorState>,
}

impl SignDetector {
    pub fn new(config: DetectorConfig, corrector: Arc<dyn TextCorrector>) -> Self {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        info!("Creating detection session: {}", session_id);

        let stability = StabilityFilter::new(config.stability_threshold, config.stability_window_ms);

        Self {
            session_id,
            config,
            corrector,
            started_at: Utc::now(),
            is_recording: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(DetectorState {
                stability,
                transcript: Vec::new(),
                last_confirmed_char: None,
                last_confirmed_at_ms: None,
                current_stable: None,
                corrected_sentence: String::new(),
            }),
        }
    }

    /// Start recording, discarding any in-progress transcript
    pub async fn start(&self) {
        info!("Recording started: {}", self.session_id);

        let mut state = self.state.lock().await;
        state.transcript.clear();
        state.stability.reset();
        state.last_confirmed_char = None;
        state.last_confirmed_at_ms = None;
        state.current_stable = None;

        self.is_recording.store(true, Ordering::SeqCst);
    }

    /// Stop recording and correct the accumulated transcript
    ///
    /// Returns `(raw_text, corrected_text)`. The correction collaborator is
    /// only consulted for non-empty transcripts, and any failure there falls
    /// back to the raw text.
    pub async fn stop(&self) -> (String, String) {
        self.is_recording.store(false, Ordering::SeqCst);

        let raw_text = {
            let state = self.state.lock().await;
            state
                .transcript
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        let corrected = if raw_text.is_empty() {
            String::new()
        } else {
            match self.corrector.correct(&raw_text).await {
                Ok(sentence) => {
                    info!("Generated sentence: {}", sentence);
                    sentence
                }
                Err(e) => {
                    error!("Text correction failed, keeping raw text: {}", e);
                    raw_text.clone()
                }
            }
        };

        {
            let mut state = self.state.lock().await;
            state.corrected_sentence = corrected.clone();
        }

        info!(
            "Recording stopped: {}. Raw: '{}', Processed: '{}'",
            self.session_id, raw_text, corrected
        );

        (raw_text, corrected)
    }

    /// Observe one raw prediction at monotonic time `now_ms`
    ///
    /// Runs the stability check and, when the sign is stable, the
    /// confirmation rule: append iff recording, the character differs from
    /// the last confirmed one, and the confirm delay has elapsed.
    pub async fn observe(&self, character: char, now_ms: u64) {
        let mut state = self.state.lock().await;

        let signal = state.stability.observe(character, now_ms);
        let stable_char = match signal.character {
            Some(ch) if signal.is_stable => ch,
            _ => return,
        };

        state.current_stable = Some(stable_char);

        if !self.is_recording.load(Ordering::SeqCst) {
            return;
        }

        if state.last_confirmed_char == Some(stable_char) {
            return;
        }

        let delay_elapsed = match state.last_confirmed_at_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= self.config.confirm_delay_ms,
        };
        if !delay_elapsed {
            return;
        }

        state.transcript.push(stable_char);
        state.last_confirmed_char = Some(stable_char);
        state.last_confirmed_at_ms = Some(now_ms);
        debug!(
            "Confirmed character: {} (transcript length {})",
            stable_char,
            state.transcript.len()
        );
    }

    /// Whether recording is active (non-blocking)
    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Currently stable character, empty if none yet
    pub async fn current_stable(&self) -> String {
        let state = self.state.lock().await;
        state.current_stable.map(String::from).unwrap_or_default()
    }

    /// Snapshot of the session for status queries
    pub async fn stats(&self) -> DetectorStats {
        let state = self.state.lock().await;

        DetectorStats {
            session_id: self.session_id.clone(),
            is_recording: self.is_recording.load(Ordering::SeqCst),
            started_at: self.started_at,
            transcript: state.transcript.clone(),
            current_stable: state.current_stable.map(String::from).unwrap_or_default(),
            corrected_sentence: state.corrected_sentence.clone(),
        }
    }
}
