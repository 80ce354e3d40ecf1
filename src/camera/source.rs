use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A single captured video frame, already encoded for streaming
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// JPEG-encoded image bytes
    pub jpeg: Vec<u8>,
    /// Timestamp in milliseconds since capture started (monotonic)
    pub timestamp_ms: u64,
    /// Frame sequence number
    pub sequence: u64,
}

/// Frame capture source trait
///
/// Implementations:
/// - Directory: read pre-encoded JPEG frames from a folder (testing/demo)
/// - Device: platform camera backend (not available on all builds)
#[async_trait::async_trait]
pub trait FrameSource: Send {
    /// Open the underlying device or file set
    async fn open(&mut self) -> Result<()>;

    /// Read the next frame; errors are transient read failures
    async fn read_frame(&mut self) -> Result<VideoFrame>;

    /// Check if the source is currently open
    fn is_open(&self) -> bool;

    /// Release the device. Must be safe to call when already closed.
    fn close(&mut self);

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Frame source selection
#[derive(Debug, Clone)]
pub enum CameraSource {
    /// Camera device by index
    Device(u32),
    /// Directory of encoded JPEG frames, played in a loop (testing/demo)
    Directory(PathBuf),
}

/// Frame source factory
pub struct FrameSourceFactory;

impl FrameSourceFactory {
    /// Create a frame source based on configuration
    pub fn create(source: CameraSource, frame_interval: Duration) -> Result<Box<dyn FrameSource>> {
        match source {
            CameraSource::Device(index) => {
                bail!(
                    "camera device {} requires a platform capture backend; \
                     configure camera.frame_dir to stream from a frame directory",
                    index
                )
            }
            CameraSource::Directory(path) => {
                Ok(Box::new(DirectoryFrameSource::new(path, frame_interval)))
            }
        }
    }
}

/// Frame source backed by a directory of JPEG files
///
/// Plays the files in sorted order and wraps around, pacing reads by a fixed
/// frame interval so downstream timing behaves like a live camera.
pub struct DirectoryFrameSource {
    dir: PathBuf,
    frame_interval: Duration,
    files: Vec<PathBuf>,
    next_index: usize,
    sequence: u64,
    opened_at: Option<Instant>,
}

impl DirectoryFrameSource {
    pub fn new(dir: PathBuf, frame_interval: Duration) -> Self {
        Self {
            dir,
            frame_interval,
            files: Vec::new(),
            next_index: 0,
            sequence: 0,
            opened_at: None,
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for DirectoryFrameSource {
    async fn open(&mut self) -> Result<()> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read frame directory: {:?}", self.dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("jpg") | Some("jpeg")
                )
            })
            .collect();

        if files.is_empty() {
            bail!("No JPEG frames found in {:?}", self.dir);
        }

        files.sort();
        self.files = files;
        self.next_index = 0;
        self.opened_at = Some(Instant::now());

        Ok(())
    }

    async fn read_frame(&mut self) -> Result<VideoFrame> {
        let opened_at = match self.opened_at {
            Some(t) => t,
            None => bail!("Frame source not open"),
        };

        // Pace reads like a live camera
        tokio::time::sleep(self.frame_interval).await;

        let path = &self.files[self.next_index];
        let jpeg = std::fs::read(path)
            .with_context(|| format!("Failed to read frame file: {:?}", path))?;

        self.next_index = (self.next_index + 1) % self.files.len();

        let frame = VideoFrame {
            jpeg,
            timestamp_ms: opened_at.elapsed().as_millis() as u64,
            sequence: self.sequence,
        };
        self.sequence += 1;

        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    fn close(&mut self) {
        self.opened_at = None;
        self.files.clear();
        self.next_index = 0;
    }

    fn name(&self) -> &str {
        "directory"
    }
}
