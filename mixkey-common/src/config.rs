//! Configuration file loading and resolution
//!
//! Resolution priority order:
//! 1. Explicit path argument (highest priority)
//! 2. `MIXKEY_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/mixkey/config.toml` on Linux)
//! 4. Compiled defaults (empty config, every field falls back)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw TOML configuration file contents
///
/// Every field is optional; resolution to effective values (with environment
/// overrides and compiled defaults) happens in the consuming crate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Native confidence threshold for the high-confidence fusion rule
    pub confidence_threshold: Option<f32>,

    /// Analysis frame size in samples
    pub frame_size: Option<usize>,

    /// Analysis hop size in samples
    pub hop_size: Option<usize>,

    /// Per-source lookup timeout in milliseconds
    pub lookup_timeout_ms: Option<u64>,

    /// Endpoint URL for the bundled HTTP lookup source
    pub lookup_endpoint: Option<String>,
}

impl TomlConfig {
    /// Load configuration following the priority order above
    ///
    /// A missing config file is not an error (compiled defaults apply);
    /// an unreadable or malformed file is.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match resolve_config_path(explicit_path) {
            Some(p) => p,
            None => {
                debug!("No config file found, using compiled defaults");
                return Ok(Self::default());
            }
        };

        let contents = std::fs::read_to_string(&path)?;
        let config: TomlConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Resolve the config file path, or None if no file exists anywhere
fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("MIXKEY_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("mixkey").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    None
}
