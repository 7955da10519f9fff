//! HTTP lookup source adapter
//!
//! Minimal JSON client against a configurable track-metadata endpoint.
//! Expected response shape: `{"key": "Am", "bpm": 124, "confidence": "high"}`
//! with every field optional. A 404 is a valid "no data" outcome.

use super::LookupSource;
use crate::error::EngineError;
use crate::types::{ConfidenceTier, LookupRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

const USER_AGENT: &str = "MixKey/0.1.0 (https://github.com/mixkey/mixkey)";
const RATE_LIMIT_MS: u64 = 500; // 2 requests per second (conservative)

/// Track metadata response (simplified)
#[derive(Debug, Clone, Deserialize)]
struct TrackResponse {
    /// Musical key as spelled by the source
    key: Option<String>,
    /// Beats per minute
    bpm: Option<f64>,
    /// Source-reported confidence tier ("high" | "medium" | "low")
    confidence: Option<String>,
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait_if_needed(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(instant) = *last {
            let elapsed = instant.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Lookup source backed by a JSON HTTP endpoint
pub struct HttpLookupSource {
    client: reqwest::Client,
    endpoint: String,
    source_name: &'static str,
    rate_limiter: RateLimiter,
}

impl HttpLookupSource {
    /// Create a source against the given endpoint URL
    pub fn new(endpoint: impl Into<String>, source_name: &'static str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            source_name,
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        }
    }
}

#[async_trait]
impl LookupSource for HttpLookupSource {
    fn name(&self) -> &'static str {
        self.source_name
    }

    async fn lookup(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> Result<Option<LookupRecord>, EngineError> {
        self.rate_limiter.wait_if_needed().await;

        let mut query = vec![("title", title.to_string())];
        if let Some(artist) = artist {
            query.push(("artist", artist.to_string()));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .query(&query)
            .send()
            .await
            .map_err(|e| EngineError::Lookup(format!("{}: {}", self.source_name, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("{}: no data for {:?}", self.source_name, title);
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(EngineError::Lookup(format!(
                "{}: HTTP {}",
                self.source_name,
                response.status()
            )));
        }

        let track: TrackResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Lookup(format!("{}: parse error: {}", self.source_name, e)))?;

        if track.key.is_none() && track.bpm.is_none() {
            return Ok(None);
        }

        let tier = match track.confidence.as_deref() {
            Some("high") => ConfidenceTier::High,
            Some("medium") => ConfidenceTier::Medium,
            _ => ConfidenceTier::Low,
        };

        Ok(Some(LookupRecord {
            key: track.key,
            bpm: track.bpm.map(|b| b.max(0.0).round() as u32),
            source: self.source_name.to_string(),
            tier,
        }))
    }
}
