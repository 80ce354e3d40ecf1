//! Frame capture and resilient supply
//!
//! The supply loop owns a `FrameSource` exclusively and exposes a pull-based
//! sequence of frame events, surviving transient read failures and device
//! loss with bounded retry and backoff.

mod source;
mod supply;

pub use source::{CameraSource, DirectoryFrameSource, FrameSource, FrameSourceFactory, VideoFrame};
pub use supply::{FrameEvent, FrameSupplyLoop, SourceState, SupplyConfig};
