use crate::camera::{CameraSource, SupplyConfig};
use crate::detect::DetectorConfig;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detection: DetectorConfig,
    #[serde(default)]
    pub correction: CorrectionConfig,
    #[serde(default)]
    pub signs: SignsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    /// Camera device index, used when no frame directory is set
    pub device_index: u32,
    /// Directory of JPEG frames to stream instead of a device
    pub frame_dir: Option<PathBuf>,
    /// Delay between frames from a directory source, in milliseconds
    pub frame_interval_ms: u64,
    /// Consecutive read failures tolerated before reconnecting
    pub max_read_failures: u32,
    /// Reconnection cycles before giving up on the device
    pub max_reconnect_attempts: u32,
    /// Seconds between failed open attempts
    pub reconnect_backoff_secs: u64,
    /// Milliseconds before retrying a failed read
    pub read_retry_delay_ms: u64,
    /// Image shown in the stream while the camera is unavailable
    pub placeholder_image: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionConfig {
    pub api_url: String,
    /// Empty key disables correction (raw text passes through)
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignsConfig {
    /// Directory holding A.png .. Z.png fingerspelling images
    pub letter_images_dir: PathBuf,
    /// Path to the serialized classifier model
    pub model_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "signstream".to_string(),
            http: HttpConfig {
                bind: "127.0.0.1".to_string(),
                port: 5000,
            },
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            frame_dir: None,
            frame_interval_ms: 33,
            max_read_failures: 30,
            max_reconnect_attempts: 5,
            reconnect_backoff_secs: 2,
            read_retry_delay_ms: 100,
            placeholder_image: None,
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for SignsConfig {
    fn default() -> Self {
        Self {
            letter_images_dir: PathBuf::from("datasets/letter_images"),
            model_path: PathBuf::from("model/model.json"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file plus SIGNSTREAM_* env overrides
    ///
    /// The file is optional; every section has working defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SIGNSTREAM").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Camera source selected by this configuration
    pub fn camera_source(&self) -> CameraSource {
        match &self.camera.frame_dir {
            Some(dir) => CameraSource::Directory(dir.clone()),
            None => CameraSource::Device(self.camera.device_index),
        }
    }

    /// Supply-loop limits from the camera section
    pub fn supply_config(&self) -> SupplyConfig {
        SupplyConfig {
            max_read_failures: self.camera.max_read_failures,
            max_reconnect_attempts: self.camera.max_reconnect_attempts,
            reconnect_backoff: Duration::from_secs(self.camera.reconnect_backoff_secs),
            read_retry_delay: Duration::from_millis(self.camera.read_retry_delay_ms),
        }
    }
}
