//! Persistent defaults
//!
//! Read from `config.toml` in the platform config directory. Command-line
//! flags take precedence over every value here.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::compositor::RestorePolicy;
use crate::errors::{Result, TpixError};
use crate::fit::DEFAULT_ANIMATED_WIDTH;

/// Defaults applied to every render request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TpixConfig {
    /// Times an animation is played
    pub loop_count: u32,

    /// Multiplier applied to every frame delay
    pub delay_multiplier: f64,

    /// Column budget for animations without an explicit width
    pub animated_width: u32,

    /// Reproduce the restore-to-previous handling of older exports
    pub legacy_restore: bool,
}

impl Default for TpixConfig {
    fn default() -> Self {
        Self {
            loop_count: 1,
            delay_multiplier: 1.0,
            animated_width: DEFAULT_ANIMATED_WIDTH,
            legacy_restore: false,
        }
    }
}

impl TpixConfig {
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tpix").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn restore_policy(&self) -> RestorePolicy {
        if self.legacy_restore {
            RestorePolicy::Alias
        } else {
            RestorePolicy::Snapshot
        }
    }
}

/// Load the user's config, falling back to defaults when there is none
pub fn load_config() -> Result<TpixConfig> {
    match TpixConfig::config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("could not determine config directory, using defaults");
            Ok(TpixConfig::default())
        }
    }
}

/// Load a config file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<TpixConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(TpixConfig::default());
    }

    let config_err = |message: String| TpixError::Config {
        path: path.to_path_buf(),
        message,
    };

    let content =
        fs::read_to_string(path).map_err(|e| config_err(format!("failed to read: {e}")))?;
    let config: TpixConfig =
        toml::from_str(&content).map_err(|e| config_err(format!("invalid TOML: {e}")))?;

    debug!(?config, "loaded config");
    Ok(config)
}
