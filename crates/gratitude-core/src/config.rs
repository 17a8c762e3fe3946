//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, where tokens are kept and an optional request timeout.
//!
//! Configuration is stored at `~/.config/gratitude-journal/config.json`.
//! The `GRATITUDE_API_URL` environment variable overrides the stored URL.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "gratitude-journal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "GRATITUDE_API_URL";

/// API base URL when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Where the session credentials live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// JSON file in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only
    Memory,
}

impl FromStr for TokenStorage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(TokenStorage::File),
            "keyring" => Ok(TokenStorage::Keyring),
            "memory" => Ok(TokenStorage::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown token storage '{}', expected file, keyring or memory",
                other
            )),
        }
    }
}

impl fmt::Display for TokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenStorage::File => "file",
            TokenStorage::Keyring => "keyring",
            TokenStorage::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    #[serde(default)]
    pub token_storage: TokenStorage,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
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
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL: environment, then config file, then the default
    pub fn api_base_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Open the configured token store
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match self.token_storage {
            TokenStorage::File => Arc::new(FileTokenStore::new(&self.cache_dir()?)),
            TokenStorage::Keyring => Arc::new(KeyringTokenStore::new()),
            TokenStorage::Memory => Arc::new(MemoryTokenStore::new()),
        };
        Ok(store)
    }
}
