//! Startup configuration.
//!
//! Parameters are resolved once, in this order:
//!
//! 1. built-in defaults ([`EstimationParameters::default`]);
//! 2. a TOML file (`MELODY_CONFIG`, else `listeners.toml` in the usual
//!    locations), if one exists;
//! 3. per-field environment overrides (`WEEKDAY_PEAK`, `JITTER_SIGMA`, ...).
//!
//! The merged result is validated before it is returned, so a bad value stops
//! the process at startup instead of skewing estimates later.

pub mod env;
pub mod file;

pub use env::{apply_overrides, apply_server_overrides, CONFIG_PATH_VAR};
pub use file::{ConfigFile, ServerSettings};

use crate::error::Result;
use crate::models::EstimationParameters;

/// Fully resolved startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub estimation: EstimationParameters,
    pub server: ServerSettings,
}

impl Settings {
    /// Resolve settings from the process environment and file system.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                log::info!("Loading configuration from {}", path);
                ConfigFile::from_file(&path)?
            }
            None => ConfigFile::from_default_location()?.unwrap_or_default(),
        };

        let mut estimation = file.estimation;
        apply_overrides(&mut estimation, &lookup)?;
        estimation.validate()?;

        let mut server = file.server;
        apply_server_overrides(&mut server, &lookup)?;

        Ok(Self { estimation, server })
    }
}
