//! Tempo estimation boundary contract
//!
//! The engine does not implement rhythm analysis itself; it wraps a
//! collaborator-provided extractor into a uniform `TempoEstimate` shape.
//! A failing extractor reports `{bpm: 0, confidence: 0}` rather than
//! propagating, so BPM failure never aborts the overall analysis.

use crate::error::EngineError;
use crate::types::TempoEstimate;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Raw output of a rhythm extractor before normalization
#[derive(Debug, Clone, Copy)]
pub struct RawTempo {
    /// Beats per minute as reported by the extractor
    pub bpm: f64,

    /// Extractor confidence (nominally 0.0-1.0)
    pub confidence: f32,
}

/// Rhythm analysis collaborator boundary
///
/// Given the full sample buffer, returns a tempo and confidence pair for
/// the whole signal.
#[async_trait]
pub trait RhythmExtractor: Send + Sync {
    /// Extractor name for logging and provenance
    fn name(&self) -> &'static str;

    /// Analyze the full signal for tempo
    async fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<RawTempo, EngineError>;
}

/// Run the rhythm extractor and normalize its output
///
/// BPM is rounded to the nearest integer and confidence clamped to
/// `[0.0, 1.0]`.
pub async fn estimate_tempo(
    extractor: &dyn RhythmExtractor,
    samples: &[f32],
    sample_rate: u32,
) -> TempoEstimate {
    match extractor.extract(samples, sample_rate).await {
        Ok(raw) => {
            let estimate = TempoEstimate {
                bpm: raw.bpm.max(0.0).round() as u32,
                confidence: raw.confidence.clamp(0.0, 1.0),
            };
            debug!(
                "Tempo estimate from {}: {} BPM ({:.3})",
                extractor.name(),
                estimate.bpm,
                estimate.confidence
            );
            estimate
        }
        Err(e) => {
            warn!("Rhythm extractor {} failed: {}", extractor.name(), e);
            TempoEstimate::silent()
        }
    }
}
