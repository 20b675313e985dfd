//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the backend base URL and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/minijira-tui/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "minijira-tui";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend location when nothing is configured
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the configured base URL
const BASE_URL_ENV: &str = "MINIJIRA_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Backend base URL: environment override first, then the config file,
    /// then the default
    pub fn base_url(&self) -> String {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                return url;
            }
        }
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding session storage and log files
    pub fn storage_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
