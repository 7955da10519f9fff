//! Engine configuration resolution
//!
//! Per-field priority: `MIXKEY_*` environment variable → TOML config file →
//! compiled default.

use mixkey_common::config::TomlConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Effective engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Native confidence threshold `T` for the high-confidence fusion rule
    pub confidence_threshold: f32,

    /// Chromagram analysis frame size in samples
    pub frame_size: usize,

    /// Chromagram analysis hop size in samples
    pub hop_size: usize,

    /// Per-source lookup timeout; a slow source must not stall the request
    pub lookup_timeout: Duration,

    /// Endpoint URL for the bundled HTTP lookup source
    pub lookup_endpoint: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.85,
            frame_size: 4096,
            hop_size: 2048,
            lookup_timeout: Duration::from_millis(8000),
            lookup_endpoint: None,
        }
    }
}

impl EngineConfig {
    /// Resolve effective configuration from a loaded TOML config
    pub fn resolve(toml: &TomlConfig) -> Self {
        let defaults = Self::default();

        let confidence_threshold = env_parse::<f32>("MIXKEY_CONFIDENCE_THRESHOLD")
            .or(toml.confidence_threshold)
            .unwrap_or(defaults.confidence_threshold)
            .clamp(0.0, 1.0);

        let frame_size = env_parse::<usize>("MIXKEY_FRAME_SIZE")
            .or(toml.frame_size)
            .unwrap_or(defaults.frame_size);

        let hop_size = env_parse::<usize>("MIXKEY_HOP_SIZE")
            .or(toml.hop_size)
            .unwrap_or(defaults.hop_size);

        let lookup_timeout = env_parse::<u64>("MIXKEY_LOOKUP_TIMEOUT_MS")
            .or(toml.lookup_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.lookup_timeout);

        let lookup_endpoint = std::env::var("MIXKEY_LOOKUP_ENDPOINT")
            .ok()
            .or_else(|| toml.lookup_endpoint.clone());

        Self {
            confidence_threshold,
            frame_size,
            hop_size,
            lookup_timeout,
            lookup_endpoint,
        }
    }
}

/// Parse an environment variable, warning (and falling through) on bad values
fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}: {:?}", name, raw);
            None
        }
    }
}
