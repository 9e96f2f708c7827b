//! Configuration file support for mapscriber.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/mapscriber/config.toml`. Settings include gesture thresholds,
//! the default mode, touch handling, overlay layer ids and optional keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod keybindings;
pub mod types;

pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{GestureConfig, InteractionConfig, StyleConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [gestures]
/// click_tolerance_px = 12.0
/// click_interval_ms = 500
/// tap_tolerance_px = 25.0
/// tap_interval_ms = 250
///
/// [interaction]
/// default_mode = "simple_select"
/// touch_enabled = true
///
/// [style]
/// overlay_layers = ["mapscriber-features.cold", "mapscriber-features.hot"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Click and tap recognition thresholds
    #[serde(default)]
    pub gestures: GestureConfig,

    /// Default mode and input sources
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Overlay layers managed by the editor
    #[serde(default)]
    pub style: StyleConfig,

    /// Optional keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `click_tolerance_px`, `tap_tolerance_px`: 1.0 - 100.0
    /// - `click_interval_ms`, `tap_interval_ms`: 50 - 5000
    /// - `default_mode`: must not be empty
    pub fn validate_and_clamp(&mut self) {
        let gestures = &mut self.gestures;

        if !(1.0..=100.0).contains(&gestures.click_tolerance_px) {
            log::warn!(
                "Invalid click_tolerance_px {:.1}, clamping to 1.0-100.0 range",
                gestures.click_tolerance_px
            );
            gestures.click_tolerance_px = clamp_tolerance(gestures.click_tolerance_px);
        }

        if !(1.0..=100.0).contains(&gestures.tap_tolerance_px) {
            log::warn!(
                "Invalid tap_tolerance_px {:.1}, clamping to 1.0-100.0 range",
                gestures.tap_tolerance_px
            );
            gestures.tap_tolerance_px = clamp_tolerance(gestures.tap_tolerance_px);
        }

        if !(50..=5000).contains(&gestures.click_interval_ms) {
            log::warn!(
                "Invalid click_interval_ms {}, clamping to 50-5000 range",
                gestures.click_interval_ms
            );
            gestures.click_interval_ms = gestures.click_interval_ms.clamp(50, 5000);
        }

        if !(50..=5000).contains(&gestures.tap_interval_ms) {
            log::warn!(
                "Invalid tap_interval_ms {}, clamping to 50-5000 range",
                gestures.tap_interval_ms
            );
            gestures.tap_interval_ms = gestures.tap_interval_ms.clamp(50, 5000);
        }

        if self.interaction.default_mode.trim().is_empty() {
            log::warn!(
                "Empty default_mode, falling back to '{}'",
                types::DEFAULT_MODE
            );
            self.interaction.default_mode = types::DEFAULT_MODE.to_string();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/mapscriber/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mapscriber");

        Ok(config_dir.join("config.toml"))
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str).context("Failed to parse config")?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_tolerance(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(1.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.gestures.click_tolerance_px, 12.0);
        assert_eq!(config.gestures.click_interval_ms, 500);
        assert_eq!(config.gestures.tap_tolerance_px, 25.0);
        assert_eq!(config.gestures.tap_interval_ms, 250);
        assert_eq!(config.interaction.default_mode, "simple_select");
        assert!(config.interaction.touch_enabled);
        assert_eq!(config.style.overlay_layers.len(), 2);
        assert!(!config.keybindings.enabled);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = Config::from_toml_str(
            r#"
            [gestures]
            click_tolerance_px = 0.0
            click_interval_ms = 10
            tap_tolerance_px = 500.0
            tap_interval_ms = 60000

            [interaction]
            default_mode = "  "
            "#,
        )
        .unwrap();

        assert_eq!(config.gestures.click_tolerance_px, 1.0);
        assert_eq!(config.gestures.click_interval_ms, 50);
        assert_eq!(config.gestures.tap_tolerance_px, 100.0);
        assert_eq!(config.gestures.tap_interval_ms, 5000);
        assert_eq!(config.interaction.default_mode, "simple_select");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [interaction]
            touch_enabled = false

            [keybindings]
            enabled = true
            "#,
        )
        .unwrap();

        assert!(!config.interaction.touch_enabled);
        assert_eq!(config.interaction.default_mode, "simple_select");
        assert!(config.keybindings.enabled);
        assert_eq!(config.keybindings.trash.len(), 2);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("[gestures\nclick = ").is_err());
    }

    #[test]
    fn test_load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[style]\noverlay_layers = [\"only\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.style.overlay_layers, vec!["only".to_string()]);
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        assert!(schema.contains("gestures"));
        assert!(schema.contains("keybindings"));
    }
}
