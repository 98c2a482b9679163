//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\dupe-minder\config.toml
//! - macOS: ~/Library/Application Support/dupe-minder/config.toml
//! - Linux: ~/.config/dupe-minder/config.toml
//!
//! Every field has a default, so a missing or partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sentinel::DEFAULT_PREFIX;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tag-flagging settings
    pub flag: FlagConfig,

    /// File-moving settings
    #[serde(rename = "move")]
    pub relocate: MoveConfig,

    /// Directory walk settings
    pub scan: ScanConfig,
}

/// Settings for the `flag` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlagConfig {
    /// Titles merge when their similarity is strictly above this
    pub threshold: f64,

    /// Marker prefix written into the composer/comment field
    pub sentinel_prefix: String,

    /// Append-only run log
    pub log_file: PathBuf,

    /// Re-read flagged files and check the marker stuck
    pub verify: bool,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            sentinel_prefix: DEFAULT_PREFIX.to_string(),
            log_file: PathBuf::from("flag_dupes.log"),
            verify: true,
        }
    }
}

/// Settings for the `move` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoveConfig {
    /// Stricter than flagging, since moves touch the file layout
    pub threshold: f64,

    /// Append-only run log
    pub log_file: PathBuf,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            log_file: PathBuf::from("move_dupes.log"),
        }
    }
}

/// Directory walk settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Visit directory entries in file name order
    pub sort_paths: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { sort_paths: true }
    }
}

impl Config {
    /// Reject values the pipeline cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("flag.threshold", self.flag.threshold),
            ("move.threshold", self.relocate.threshold),
        ] {
            // At 1.0 nothing can score strictly above, so identical titles would split
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::Threshold { name, value });
            }
        }
        if self.flag.sentinel_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        Ok(())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dupe-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load and validate configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    config.validate()?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("{name} must be within [0, 1), got {value}")]
    Threshold { name: &'static str, value: f64 },

    #[error("flag.sentinel_prefix must not be empty")]
    EmptyPrefix,
}

// ============================================================================
// Tests
// ============================================================================
