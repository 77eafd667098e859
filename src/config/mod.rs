// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, read from a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language
//! - `[study]` - Default study endpoint and header text
//! - `[viewer]` - Prefetch, wheel debounce and export settings
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `STUDY_LENS_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use study_lens::config::{self, Config};
//!
//! let (config, warning) = config::load();
//! if let Some(key) = warning {
//!     eprintln!("settings.toml ignored: {key}");
//! }
//! println!("{:?}", config.study.endpoint);
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use crate::media::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// i18n key surfaced when an existing settings file cannot be parsed.
pub const CONFIG_LOAD_WARNING_KEY: &str = "notification-config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "es").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Study opened at startup and its header text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StudyConfig {
    /// HTTP(S) manifest URL, local manifest file or local directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Acquisition date shown under the title, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Viewer behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    /// Images requested on each side of the current one.
    #[serde(
        default = "default_prefetch_radius",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefetch_radius: Option<usize>,

    /// Memory budget for decoded images, in megabytes.
    #[serde(
        default = "default_prefetch_cache_mb",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefetch_cache_mb: Option<u32>,

    /// Wheel bursts shorter than this collapse into one step.
    #[serde(
        default = "default_wheel_debounce_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub wheel_debounce_ms: Option<u64>,

    /// Extension proposed by the export dialog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_format: Option<ExportFormat>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            prefetch_radius: default_prefetch_radius(),
            prefetch_cache_mb: default_prefetch_cache_mb(),
            wheel_debounce_ms: default_wheel_debounce_ms(),
            export_format: Some(ExportFormat::default()),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub study: StudyConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_prefetch_radius() -> Option<usize> {
    Some(DEFAULT_PREFETCH_RADIUS)
}

fn default_prefetch_cache_mb() -> Option<u32> {
    Some(DEFAULT_PREFETCH_CACHE_MB)
}

fn default_wheel_debounce_ms() -> Option<u64> {
    Some(DEFAULT_WHEEL_DEBOUNCE_MS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    eprintln!("Failed to load {}: {}", path.display(), err);
                    return (Config::default(), Some(CONFIG_LOAD_WARNING_KEY.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("es".to_string()),
            },
            study: StudyConfig {
                endpoint: Some("https://pacs.example.org/api/studies/1/images".into()),
                title: Some("Chest CT".into()),
                date: Some("2024-03-02".into()),
                description: None,
            },
            viewer: ViewerConfig {
                prefetch_radius: Some(5),
                prefetch_cache_mb: Some(32),
                wheel_debounce_ms: Some(60),
                export_format: Some(ExportFormat::Jpg),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_falls_back_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[viewer\nbroken")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some(CONFIG_LOAD_WARNING_KEY));
    }

    #[test]
    fn load_with_override_missing_file_is_silent_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[study]\nendpoint = \"/data/ct\"\n")
            .expect("partial config should parse");
        assert_eq!(config.study.endpoint.as_deref(), Some("/data/ct"));
        assert_eq!(config.viewer.prefetch_radius, Some(DEFAULT_PREFETCH_RADIUS));
        assert_eq!(config.viewer.wheel_debounce_ms, Some(DEFAULT_WHEEL_DEBOUNCE_MS));
        assert!(config.general.language.is_none());
    }

    #[test]
    fn load_with_override_reads_settings_from_directory() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut config = Config::default();
        config.study.title = Some("Chest CT".into());
        save_to_path(&config, &temp_dir.path().join(CONFIG_FILE)).expect("save should succeed");

        let (loaded, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(loaded, config);
    }
}
