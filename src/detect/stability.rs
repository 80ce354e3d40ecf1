use std::collections::VecDeque;

/// Result of observing one raw prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableSignal {
    /// Whether the sign is currently held stable
    pub is_stable: bool,
    /// The stabilized character, when stable
    pub character: Option<char>,
}

impl StableSignal {
    fn unstable() -> Self {
        Self {
            is_stable: false,
            character: None,
        }
    }

    fn stable(character: char) -> Self {
        Self {
            is_stable: true,
            character: Some(character),
        }
    }
}

/// Time-window debouncer for raw per-frame predictions
///
/// Keeps recent (character, timestamp) observations bounded by a sliding
/// time window and reports a sign as stable once the last `threshold`
/// observations in the window agree on one character. Classifier jitter
/// breaks the consecutive run and resets the verdict.
#[derive(Debug)]
pub struct StabilityFilter {
    window: VecDeque<(char, u64)>,
    /// Consecutive identical observations required for stability
    threshold: usize,
    /// Window width in milliseconds; older entries are pruned
    window_ms: u64,
}

impl StabilityFilter {
    pub fn new(threshold: usize, window_ms: u64) -> Self {
        Self {
            window: VecDeque::new(),
            threshold,
            window_ms,
        }
    }

    /// Observe one raw prediction at monotonic time `now_ms`
    pub fn observe(&mut self, character: char, now_ms: u64) -> StableSignal {
        // Drop observations that have aged out of the window
        while let Some(&(_, t)) = self.window.front() {
            if now_ms.saturating_sub(t) >= self.window_ms {
                self.window.pop_front();
            } else {
                break;
            }
        }

        self.window.push_back((character, now_ms));

        if self.window.len() >= self.threshold {
            let recent = self.window.iter().rev().take(self.threshold);
            let mut all_match = true;
            for &(ch, _) in recent {
                if ch != character {
                    all_match = false;
                    break;
                }
            }
            if all_match {
                return StableSignal::stable(character);
            }
        }

        StableSignal::unstable()
    }

    /// Number of observations currently in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Empty the window (recording start discards history)
    pub fn reset(&mut self) {
        self.window.clear();
    }
}
