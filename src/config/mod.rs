// SPDX-License-Identifier: MPL-2.0
//! This module handles the control's configuration, including loading and saving
//! preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[behavior]` - What the control does when loaded/unloaded
//! - `[audio]` - Volume, balance and mute
//! - `[seeking]` - Speed ratio, preferred position format and start position
//! - `[engine]` - Engine thread name and position polling interval
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `MEDIA_ELEMENT_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use media_element::config::{self, PlayerConfig};
//! use media_element::domain::PlaybackState;
//!
//! let mut config = config::load().unwrap_or_default();
//! config.behavior.loaded = PlaybackState::Play;
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::{Balance, PlaybackState, PositionFormat, SpeedRatio, Ticks, Volume};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "MediaElement";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "MEDIA_ELEMENT_CONFIG_DIR";

// =============================================================================
// Section Structs
// =============================================================================

/// Loaded/unloaded behavior of the control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehaviorConfig {
    /// State requested when the control is loaded.
    #[serde(default)]
    pub loaded: PlaybackState,

    /// State requested when the control is unloaded or its window closes.
    #[serde(default = "default_unloaded")]
    pub unloaded: PlaybackState,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            loaded: PlaybackState::Manual,
            unloaded: default_unloaded(),
        }
    }
}

/// Audio levels pushed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AudioConfig {
    #[serde(default)]
    pub volume: Volume,

    #[serde(default)]
    pub balance: Balance,

    #[serde(default)]
    pub muted: bool,
}

/// Seeking parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeekingConfig {
    #[serde(default)]
    pub speed_ratio: SpeedRatio,

    #[serde(default = "default_preferred_format")]
    pub preferred_position_format: PositionFormat,

    /// Start position applied once media opens.
    #[serde(default)]
    pub position: Ticks,
}

impl Default for SeekingConfig {
    fn default() -> Self {
        Self {
            speed_ratio: SpeedRatio::default(),
            preferred_position_format: default_preferred_format(),
            position: Ticks::ZERO,
        }
    }
}

/// Engine thread settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Interval between native position polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Name given to the engine thread.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            thread_name: default_thread_name(),
        }
    }
}

impl EngineConfig {
    /// Polling interval, never shorter than [`MIN_POLL_INTERVAL_MS`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Control configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlayerConfig {
    #[serde(default)]
    pub behavior: BehaviorConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub seeking: SeekingConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_unloaded() -> PlaybackState {
    PlaybackState::Close
}

fn default_preferred_format() -> PositionFormat {
    PositionFormat::MediaTime
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_thread_name() -> String {
    DEFAULT_ENGINE_THREAD_NAME.to_string()
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config directory: explicit override, then the environment
/// variable, then the platform config directory.
fn config_dir_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    base_dir
        .or_else(|| std::env::var_os(ENV_CONFIG_DIR).map(PathBuf::from))
        .or_else(|| {
            dirs::config_dir().map(|mut path| {
                path.push(APP_NAME);
                path
            })
        })
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load / Save
// =============================================================================

/// Loads the configuration from the default path.
///
/// A missing file yields the defaults.
pub fn load() -> Result<PlayerConfig> {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> Result<PlayerConfig> {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(PlayerConfig::default())
}

/// Loads configuration from a specific path.
///
/// Unparsable content falls back to the defaults with a warning; only I/O
/// failures are errors.
pub fn load_from_path(path: &Path) -> Result<PlayerConfig> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
            Ok(PlayerConfig::default())
        }
    }
}

/// Saves the configuration to the default path.
pub fn save(config: &PlayerConfig) -> Result<()> {
    if let Some(path) = config_path_with_override(None) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &PlayerConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_matches_control_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.behavior.loaded, PlaybackState::Manual);
        assert_eq!(config.behavior.unloaded, PlaybackState::Close);
        assert_eq!(config.audio.volume, Volume::new(1.0));
        assert_eq!(config.audio.balance, Balance::CENTER);
        assert!(!config.audio.muted);
        assert_eq!(config.seeking.speed_ratio, SpeedRatio::NORMAL);
        assert_eq!(
            config.seeking.preferred_position_format,
            PositionFormat::MediaTime
        );
        assert_eq!(config.seeking.position, Ticks::ZERO);
        assert_eq!(config.engine.thread_name, DEFAULT_ENGINE_THREAD_NAME);
    }

    #[test]
    fn save_and_load_round_trip_preserves_sections() {
        let mut config = PlayerConfig::default();
        config.behavior.loaded = PlaybackState::Play;
        config.audio.volume = Volume::new(0.25);
        config.audio.muted = true;
        config.seeking.preferred_position_format = PositionFormat::Frame;
        config.engine.poll_interval_ms = 40;

        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[behavior]\nloaded = \"play\"\n").expect("write");

        let loaded = load_from_path(&config_path).expect("load");
        assert_eq!(loaded.behavior.loaded, PlaybackState::Play);
        assert_eq!(loaded.behavior.unloaded, PlaybackState::Close);
        assert_eq!(loaded.engine, EngineConfig::default());
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, PlayerConfig::default());
    }

    #[test]
    fn unknown_behavior_name_falls_back_to_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[behavior]\nloaded = \"rewind\"\n").expect("write");

        let loaded = load_from_path(&config_path).expect("load");
        assert_eq!(loaded.behavior.loaded, PlaybackState::Manual);
    }

    #[test]
    fn non_positive_speed_ratio_is_rejected_at_parse_time() {
        let parsed = toml::from_str::<PlayerConfig>("[seeking]\nspeed_ratio = 0.0\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn load_with_override_uses_defaults_when_file_missing() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let loaded =
            load_with_override(Some(temp_dir.path().to_path_buf())).expect("load should succeed");
        assert_eq!(loaded, PlayerConfig::default());
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let engine = EngineConfig {
            poll_interval_ms: 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            engine.poll_interval(),
            Duration::from_millis(MIN_POLL_INTERVAL_MS)
        );
    }
}
