//! Configuration management for chatlog-viewer.
//!
//! Handles:
//! - Viewer identity and search defaults
//! - Import policy and limits
//! - Display settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::parser::DEFAULT_MAX_FILE_SIZE;
use crate::search::SearchMode;
use crate::session::{ImportPolicy, SessionOptions};

/// Config file name inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Application directory name.
pub const APP_DIR: &str = "chatlog-viewer";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Viewer settings.
    #[serde(default)]
    pub viewer: ViewerConfig,
    /// Import settings.
    #[serde(default)]
    pub import: ImportConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewerError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| ViewerError::InvalidConfig {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Session options derived from the import settings.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            policy: self.import.policy,
            max_file_size: self.import.max_file_size,
        }
    }
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Sender name treated as the local user.
    #[serde(default)]
    pub current_user: Option<String>,
    /// Quiet period before a search runs, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Search mode used when none is given.
    #[serde(default)]
    pub default_mode: SearchMode,
}

impl ViewerConfig {
    /// Debounce delay as a duration.
    #[must_use]
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            current_user: None,
            search_debounce_ms: default_debounce_ms(),
            default_mode: SearchMode::default(),
        }
    }
}

/// Import configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// What happens to the rest of a batch after a file fails.
    #[serde(default)]
    pub policy: ImportPolicy,
    /// Only pick up `*.json` files when expanding directories.
    #[serde(default = "default_true")]
    pub json_only: bool,
    /// Maximum thread file size in bytes (0 = unlimited).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            policy: ImportPolicy::default(),
            json_only: true,
            max_file_size: default_max_file_size(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Use color output.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Show the thread title next to sender labels.
    #[serde(default)]
    pub show_thread_titles: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_thread_titles: false,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| ViewerError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join(APP_DIR).join(CONFIG_FILENAME))
}
