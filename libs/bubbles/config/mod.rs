use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::domain::DEFAULT_MAX_RECORDS;

/// Public blockchain.info push endpoint
pub const DEFAULT_FEED_URL: &str = "wss://ws.blockchain.info/inv";

/// Environment variable that overrides `feed.url`
pub const FEED_URL_ENV: &str = "BUBBLES_FEED_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BubblesConfig {
    pub feed: FeedConfig,
    pub view: ViewConfig,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// File the TUI writes its logs to
    pub log_file: String,
}

impl Default for BubblesConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            view: ViewConfig::default(),
            log_level: "info".to_string(),
            log_file: "bubbles.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    /// Subscribe as part of every (re)connect instead of waiting for Start
    pub subscribe_on_connect: bool,
    /// Seconds between `{"op":"ping"}` frames, 0 disables
    pub heartbeat_secs: u64,
    /// 0 disables reconnection
    pub max_reconnect_attempts: usize,
    pub reconnect_initial_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            subscribe_on_connect: false,
            heartbeat_secs: 30,
            max_reconnect_attempts: 5,
            reconnect_initial_ms: 1000,
        }
    }
}

impl FeedConfig {
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        (self.heartbeat_secs > 0).then(|| Duration::from_secs(self.heartbeat_secs))
    }

    pub fn reconnect_initial_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Logical canvas width
    pub width: f64,
    /// Logical canvas height
    pub height: f64,
    /// Radius multiplier applied to the scaled value
    pub shape_size: f64,
    /// Buffer capacity
    pub max_records: usize,
    /// Milliseconds between simulation ticks / redraws
    pub tick_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 600.0,
            shape_size: 5.0,
            max_records: DEFAULT_MAX_RECORDS,
            tick_ms: 33,
        }
    }
}

impl ViewConfig {
    /// Offset added to simulation coordinates to get canvas coordinates
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl BubblesConfig {
    /// Load configuration from a YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: BubblesConfig = serde_yaml::from_str(&yaml_content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        info!("Config file {} not found, using defaults", path.display());
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(FEED_URL_ENV) {
            info!("Overriding feed URL from environment variable");
            self.feed.url = url;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.feed.url.starts_with("ws://") || self.feed.url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(format!(
                "feed.url must start with ws:// or wss://, got '{}'",
                self.feed.url
            )));
        }

        if self.view.max_records == 0 {
            return Err(ConfigError::ValidationError(
                "view.max_records must be greater than 0".to_string(),
            ));
        }

        if !(self.view.width > 0.0 && self.view.height > 0.0) {
            return Err(ConfigError::ValidationError(
                "view.width and view.height must be greater than 0".to_string(),
            ));
        }

        if !(self.view.shape_size > 0.0) {
            return Err(ConfigError::ValidationError(
                "view.shape_size must be greater than 0".to_string(),
            ));
        }

        if self.view.tick_ms == 0 {
            return Err(ConfigError::ValidationError(
                "view.tick_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
