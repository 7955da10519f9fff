//! Native signal-analysis pipeline
//!
//! Raw audio bytes are decoded by a collaborator, sliced into frames, run
//! through a chromagram extractor, and classified against the key profile
//! table; tempo comes from the rhythm extractor boundary. The engine only
//! reads channel 0 of whatever the decoder produces.

pub mod classifier;
pub mod key_estimator;
pub mod profiles;
pub mod tempo;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::NativeAnalysis;
use tracing::debug;

/// Decoded audio handed to the analysis pipeline
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Channel-0 samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

/// Audio decoding collaborator boundary
pub trait AudioDecoder: Send + Sync {
    /// Decode raw audio bytes into channel-0 samples plus sample rate
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, EngineError>;
}

/// Chromagram extraction collaborator boundary
///
/// Given one frame of samples, returns a 12-element non-negative pitch-class
/// energy vector. Frames yielding any other shape are skipped downstream by
/// the key estimator.
pub trait ChromaExtractor: Send + Sync {
    /// Extractor name for logging and provenance
    fn name(&self) -> &'static str;

    /// Extract a chromagram from one frame of samples
    fn extract_frame(&self, frame: &[f32], sample_rate: u32) -> Result<Vec<f32>, EngineError>;
}

/// Run the full native analysis path over decoded audio
///
/// Frame extraction failures are fatal to the native path (the caller
/// absorbs the error into "no native result"); rhythm extraction failures
/// degrade to a silent tempo estimate inside [`tempo::estimate_tempo`].
pub async fn analyze_native(
    audio: &DecodedAudio,
    chroma: &dyn ChromaExtractor,
    rhythm: &dyn tempo::RhythmExtractor,
    config: &EngineConfig,
) -> Result<NativeAnalysis, EngineError> {
    let mut frames = Vec::new();
    let mut start = 0usize;

    while start + config.frame_size <= audio.samples.len() {
        let frame = &audio.samples[start..start + config.frame_size];
        let chromagram = chroma
            .extract_frame(frame, audio.sample_rate)
            .map_err(|e| EngineError::Extraction(format!("{}: {}", chroma.name(), e)))?;
        frames.push(chromagram);
        start += config.hop_size;
    }

    debug!(
        "Extracted {} chromagram frames ({} samples, frame={}, hop={})",
        frames.len(),
        audio.samples.len(),
        config.frame_size,
        config.hop_size
    );

    let key = key_estimator::estimate_key(&frames);
    let tempo = tempo::estimate_tempo(rhythm, &audio.samples, audio.sample_rate).await;

    Ok(NativeAnalysis { key, tempo })
}
