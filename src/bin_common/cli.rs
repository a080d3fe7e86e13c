//! CLI utilities for binaries
//!
//! Handles configuration loading and environment variables
//! for all binary executables.

use bubbles::{BubblesConfig, ConfigError};
use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Visualizer configuration (config/bubbles.yaml)
    Bubbles,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Bubbles => "config/bubbles.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Environment variable that overrides the default path
    ///
    /// `None` for an explicit custom path, which always wins.
    pub fn env_var_name(&self) -> Option<&str> {
        match self {
            ConfigType::Bubbles => Some("BUBBLES_CONFIG_PATH"),
            ConfigType::Custom(_) => None,
        }
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use mempool_bubbles::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Bubbles);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    config_type
        .env_var_name()
        .and_then(|name| std::env::var(name).ok())
        .unwrap_or_else(|| config_type.default_path().to_string())
        .into()
}

/// Resolve the config path and load it; a missing file yields defaults
pub fn load_config(config_type: ConfigType) -> Result<BubblesConfig, ConfigError> {
    BubblesConfig::load_or_default(load_config_from_env(config_type))
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
