//! Integration test: Configuration utilities
//!
//! Tests config path resolution and YAML loading. Everything that touches
//! process environment runs inside one test so parallel tests can't race.

use mempool_bubbles::bin_common::{load_config, load_config_from_env, ConfigType};
use mempool_bubbles::bubbles::{BubblesConfig, ConfigError};
use std::env;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_custom_config() {
    let custom = ConfigType::Custom("custom/path.yaml".to_string());
    assert_eq!(custom.default_path(), "custom/path.yaml");
}

#[test]
fn test_config_type_default_paths() {
    assert_eq!(ConfigType::Bubbles.default_path(), "config/bubbles.yaml");
    assert_eq!(ConfigType::Bubbles.env_var_name(), Some("BUBBLES_CONFIG_PATH"));
}

#[test]
fn test_environment_overrides() {
    // Default path when unset
    env::remove_var("BUBBLES_CONFIG_PATH");
    env::remove_var("BUBBLES_FEED_URL");
    let config_path = load_config_from_env(ConfigType::Bubbles);
    assert_eq!(config_path.to_str().unwrap(), "config/bubbles.yaml");

    // Config path from environment
    let file = write_config("view:\n  max_records: 25\n  tick_ms: 50\n");
    env::set_var("BUBBLES_CONFIG_PATH", file.path());
    let config = load_config(ConfigType::Bubbles).unwrap();
    assert_eq!(config.view.max_records, 25);
    assert_eq!(config.view.tick_ms, 50);
    assert_eq!(config.view.width, 700.0);

    // An explicit custom path ignores the environment
    let custom = write_config("view:\n  max_records: 7\n");
    let custom_path = custom.path().to_string_lossy().into_owned();
    assert_eq!(
        load_config_from_env(ConfigType::Custom(custom_path.clone())),
        std::path::PathBuf::from(&custom_path)
    );
    let config = load_config(ConfigType::Custom(custom_path)).unwrap();
    assert_eq!(config.view.max_records, 7);

    // Feed URL from environment
    env::set_var("BUBBLES_FEED_URL", "ws://127.0.0.1:9001");
    let config = load_config(ConfigType::Bubbles).unwrap();
    assert_eq!(config.feed.url, "ws://127.0.0.1:9001");

    // Missing file falls back to defaults
    env::set_var("BUBBLES_CONFIG_PATH", "does/not/exist.yaml");
    let config = load_config(ConfigType::Bubbles).unwrap();
    assert_eq!(config.view.max_records, 400);
    assert_eq!(config.feed.url, "ws://127.0.0.1:9001");

    env::remove_var("BUBBLES_CONFIG_PATH");
    env::remove_var("BUBBLES_FEED_URL");
}

#[test]
fn test_shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/bubbles.yaml");
    let config = BubblesConfig::load(path).unwrap();
    assert_eq!(config.view.max_records, 400);
    assert_eq!(config.view.shape_size, 5.0);
    assert!(!config.feed.subscribe_on_connect);
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let file = write_config("view: [not, a, map]\n");
    assert!(matches!(
        BubblesConfig::load(file.path()),
        Err(ConfigError::YamlError(_))
    ));
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = write_config("view:\n  shape_size: 0\n");
    assert!(matches!(
        BubblesConfig::load(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}
