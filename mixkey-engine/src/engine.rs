//! Analysis orchestrator
//!
//! Sequences the native analysis path, lookup aggregation, fusion, and
//! caching for one track. Both paths run concurrently; a failure in either
//! is absorbed into "no data for that path" and never aborts the other.
//! `analyze()` itself never fails: the worst case is the low-confidence
//! terminal state from the fusion policy.

use crate::cache::{Fingerprint, ResultCache};
use crate::config::EngineConfig;
use crate::dsp::{self, tempo::RhythmExtractor, AudioDecoder, ChromaExtractor};
use crate::fusion;
use crate::lookup::{LookupAggregator, LookupSource};
use crate::types::{AnalysisBundle, NativeAnalysis};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Detection & fusion engine front door
///
/// Owns the result cache and is its sole mutator. Collaborator boundaries
/// (decoder, extractors, lookup sources) are injected.
pub struct AnalysisEngine {
    decoder: Arc<dyn AudioDecoder>,
    chroma: Arc<dyn ChromaExtractor>,
    rhythm: Arc<dyn RhythmExtractor>,
    aggregator: LookupAggregator,
    cache: Arc<ResultCache>,
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create an engine over injected collaborators
    ///
    /// `sources` are queried in the given priority order.
    pub fn new(
        decoder: Arc<dyn AudioDecoder>,
        chroma: Arc<dyn ChromaExtractor>,
        rhythm: Arc<dyn RhythmExtractor>,
        sources: Vec<Arc<dyn LookupSource>>,
        cache: Arc<ResultCache>,
        config: EngineConfig,
    ) -> Self {
        let aggregator = LookupAggregator::new(sources, config.lookup_timeout);
        Self {
            decoder,
            chroma,
            rhythm,
            aggregator,
            cache,
            config,
        }
    }

    /// Analyze one track, returning the full bundle
    ///
    /// A cache hit on `(title, artist, byte length)` returns the stored
    /// bundle with no recomputation. On a miss, the native and lookup paths
    /// run concurrently, failures collapse to absence, and the fusion
    /// policy runs exactly once with whatever succeeded.
    pub async fn analyze(
        &self,
        audio: &[u8],
        title: &str,
        artist: Option<&str>,
    ) -> Arc<AnalysisBundle> {
        let fingerprint = Fingerprint::new(title, artist, audio);

        if let Some(bundle) = self.cache.get(&fingerprint).await {
            debug!("Cache hit for {:?} ({} bytes)", title, audio.len());
            return bundle;
        }

        info!("Analyzing {:?} ({} bytes)", title, audio.len());

        let (native, records) = tokio::join!(
            self.run_native(audio),
            self.aggregator.aggregate(title, artist)
        );

        let fusion = fusion::fuse(native.as_ref(), &records, self.config.confidence_threshold);

        let bundle = AnalysisBundle {
            native_key: native.as_ref().map(|n| n.key.clone()),
            native_tempo: native.as_ref().map(|n| n.tempo),
            lookup_records: records,
            fusion,
            analyzed_at: Utc::now(),
        };

        self.cache.insert(fingerprint, bundle).await
    }

    /// Run the native path, absorbing any failure into absence
    async fn run_native(&self, audio: &[u8]) -> Option<NativeAnalysis> {
        let decoded = match self.decoder.decode(audio) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Native path produced no data: {}", e);
                return None;
            }
        };

        match dsp::analyze_native(
            &decoded,
            self.chroma.as_ref(),
            self.rhythm.as_ref(),
            &self.config,
        )
        .await
        {
            Ok(native) => Some(native),
            Err(e) => {
                warn!("Native path produced no data: {}", e);
                None
            }
        }
    }
}
