//! Client configuration management.
//!
//! This module handles loading and saving the optional configuration file,
//! which holds the server host, the request timeout and the last username
//! used to log on.
//!
//! Configuration is stored next to the token cache at
//! `~/.config/seafile-python/config.json` (`%APPDATA%\seafile-python` on
//! Windows).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory name used under the per-user config directory
const APP_NAME: &str = "seafile-python";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// HTTP request timeout used when the config does not set one.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub host: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn config_path() -> Result<PathBuf> {
        let dir = app_config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(dir.join(CONFIG_FILE))
    }
}

/// Per-user directory holding the token cache and config file.
pub fn app_config_dir() -> Option<PathBuf> {
    base_config_dir().map(|dir| dir.join(APP_NAME))
}

#[cfg(windows)]
fn base_config_dir() -> Option<PathBuf> {
    // Roaming AppData, i.e. %APPDATA%
    dirs::config_dir()
}

#[cfg(not(windows))]
fn base_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config"))
}
