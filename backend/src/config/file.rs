//! TOML configuration file support.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EstimationError, Result};
use crate::models::EstimationParameters;

/// File name searched for when no explicit path is configured.
pub const DEFAULT_CONFIG_FILE: &str = "listeners.toml";

/// Contents of `listeners.toml`. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub estimation: EstimationParameters,
    pub server: ServerSettings,
}

/// Settings of the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Interval between events of the live stream.
    pub live_tick_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            live_tick_seconds: 5,
        }
    }
}

impl ConfigFile {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            EstimationError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EstimationError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the first `listeners.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists; a file that exists but does not
    /// parse is an error.
    pub fn from_default_location() -> Result<Option<Self>> {
        let search_paths = [
            PathBuf::from(DEFAULT_CONFIG_FILE),
            PathBuf::from("backend").join(DEFAULT_CONFIG_FILE),
            PathBuf::from("..").join(DEFAULT_CONFIG_FILE),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }

        log::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
        Ok(None)
    }
}
