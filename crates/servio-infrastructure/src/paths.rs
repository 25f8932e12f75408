//! Path management for servio configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/servio/            # Config directory (platform config dir)
//! └── config.toml              # Client configuration
//! ```

use servio_core::error::{Result, ServioError};
use std::path::PathBuf;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SERVIO_CONFIG";

const APP_DIR: &str = "servio";
const CONFIG_FILE: &str = "config.toml";

pub struct ServioPaths;

impl ServioPaths {
    /// Returns the servio configuration directory (e.g., `~/.config/servio/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ServioError::config("Cannot find the user configuration directory"))
    }

    /// Returns the path to the configuration file.
    ///
    /// `SERVIO_CONFIG` takes precedence over the platform location.
    pub fn config_file() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
