use super::source::{FrameSource, VideoFrame};
use std::time::Duration;
use tracing::{error, info, warn};

/// Limits and delays for the frame supply loop
#[derive(Debug, Clone)]
pub struct SupplyConfig {
    /// Consecutive read failures tolerated before forcing a reconnect
    pub max_read_failures: u32,
    /// Reconnection cycles allowed before giving up on the device
    pub max_reconnect_attempts: u32,
    /// Wait between failed open attempts
    pub reconnect_backoff: Duration,
    /// Wait before retrying a failed read
    pub read_retry_delay: Duration,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            max_read_failures: 30,
            max_reconnect_attempts: 5,
            reconnect_backoff: Duration::from_secs(2),
            read_retry_delay: Duration::from_millis(100),
        }
    }
}

/// Frame source lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Source not open yet
    Closed,
    /// Attempting to open the device
    Opening,
    /// Device open, frames flowing
    Open,
    /// Reconnection attempts exhausted; terminal
    Exhausted,
}

/// Event produced by one pull on the supply loop
#[derive(Debug)]
pub enum FrameEvent {
    /// A successfully captured frame
    Frame(VideoFrame),
    /// Device unavailable; a reconnect attempt is pending
    Unavailable { attempt: u32, max: u32 },
    /// Device permanently unavailable; emitted once, then the loop ends
    Exhausted,
}

/// Resilient frame supply loop
///
/// Owns the frame source exclusively and survives transient read failures
/// and device loss with bounded retry/backoff. Pull-driven: the consumer
/// calls `next_event` for as long as it wants frames, and dropping the loop
/// releases the device on any exit path.
pub struct FrameSupplyLoop {
    source: Box<dyn FrameSource>,
    config: SupplyConfig,
    state: SourceState,
    consecutive_read_failures: u32,
    reconnect_attempts: u32,
    backoff_pending: bool,
}

impl FrameSupplyLoop {
    pub fn new(source: Box<dyn FrameSource>, config: SupplyConfig) -> Self {
        Self {
            source,
            config,
            state: SourceState::Closed,
            consecutive_read_failures: 0,
            reconnect_attempts: 0,
            backoff_pending: false,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SourceState {
        self.state
    }

    /// Pull the next event. Returns `None` once the loop has terminated.
    pub async fn next_event(&mut self) -> Option<FrameEvent> {
        loop {
            match self.state {
                SourceState::Closed => {
                    self.state = SourceState::Opening;
                }

                SourceState::Opening => {
                    if self.backoff_pending {
                        tokio::time::sleep(self.config.reconnect_backoff).await;
                        self.backoff_pending = false;
                    }

                    match self.source.open().await {
                        Ok(()) => {
                            info!("Frame source '{}' opened", self.source.name());
                            self.state = SourceState::Open;
                            self.reconnect_attempts = 0;
                            self.consecutive_read_failures = 0;
                        }
                        Err(e) => {
                            self.reconnect_attempts += 1;
                            if self.reconnect_attempts >= self.config.max_reconnect_attempts {
                                error!(
                                    "Failed to open frame source after {} attempts: {}",
                                    self.reconnect_attempts, e
                                );
                                self.state = SourceState::Exhausted;
                                return Some(FrameEvent::Exhausted);
                            }

                            warn!(
                                "Failed to open frame source ({}/{}): {}",
                                self.reconnect_attempts, self.config.max_reconnect_attempts, e
                            );
                            self.backoff_pending = true;
                            return Some(FrameEvent::Unavailable {
                                attempt: self.reconnect_attempts,
                                max: self.config.max_reconnect_attempts,
                            });
                        }
                    }
                }

                SourceState::Open => match self.source.read_frame().await {
                    Ok(frame) => {
                        self.consecutive_read_failures = 0;
                        return Some(FrameEvent::Frame(frame));
                    }
                    Err(e) => {
                        self.consecutive_read_failures += 1;
                        warn!(
                            "Failed to read frame ({}/{}): {}",
                            self.consecutive_read_failures, self.config.max_read_failures, e
                        );

                        if self.consecutive_read_failures >= self.config.max_read_failures {
                            error!("Too many consecutive read failures, reconnecting");
                            self.source.close();
                            self.consecutive_read_failures = 0;
                            self.reconnect_attempts += 1;
                            if self.reconnect_attempts >= self.config.max_reconnect_attempts {
                                self.state = SourceState::Exhausted;
                                return Some(FrameEvent::Exhausted);
                            }
                            self.state = SourceState::Opening;
                        } else {
                            tokio::time::sleep(self.config.read_retry_delay).await;
                        }
                    }
                },

                SourceState::Exhausted => return None,
            }
        }
    }
}

impl Drop for FrameSupplyLoop {
    fn drop(&mut self) {
        if self.source.is_open() {
            self.source.close();
            info!("Frame source '{}' released", self.source.name());
        }
    }
}
