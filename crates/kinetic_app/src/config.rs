//! Kinetic configuration file handling
//!
//! Applications read a single `kinetic.toml`. Every table and field is
//! optional:
//!
//! ```toml
//! [gesture]
//! reset_delay_ms = 250
//! fixed_viewport = false
//!
//! [platform]
//! android_chrome = 18
//! native_point_resolution = true
//!
//! [animation]
//! target_fps = 120
//!
//! [store]
//! merge_root = true
//! source = "inbox"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use kinetic_core::StoreOptions;
use kinetic_gesture::GestureConfig;
use kinetic_platform::PlatformProfile;
use serde::{Deserialize, Serialize};

/// Defaults for stores created by the application
pub type StoreConfig = StoreOptions;

/// Application configuration stored in kinetic.toml
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub platform: PlatformProfile,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_target_fps() -> u32 {
    120
}

/// Animation settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No configuration found at {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Invalid configuration")?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gesture.reset_delay_ms, 250);
        assert!(config.store.merge_root);
        assert!(config.platform.native_point_resolution);
        assert_eq!(config.animation.target_fps, 120);
    }

    #[test]
    fn test_partial_tables() {
        let config = AppConfig::from_toml_str(
            r#"
            [gesture]
            fixed_viewport = true

            [platform]
            silk = 2

            [store]
            merge_root = false
            source = "inbox"
            "#,
        )
        .unwrap();

        assert!(config.gesture.fixed_viewport);
        assert_eq!(config.gesture.reset_delay_ms, 250);
        assert_eq!(config.platform.silk, Some(2));
        assert!(config.platform.wants_screen_coordinates());
        assert!(!config.store.merge_root);
        assert_eq!(config.store.source, "inbox");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = AppConfig::from_toml_str("[gesture]\nreset_delay_ms = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_serialized_config_reloads() {
        let mut config = AppConfig::default();
        config.platform.android_chrome = Some(18);
        config.animation.target_fps = 60;

        let text = config.to_toml_string().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("kinetic-missing-config-test.toml");
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("No configuration found"));
    }
}
