//! # MixKey Detection & Fusion Engine
//!
//! Estimates a track's musical key and tempo and produces a single,
//! confidence-rated answer by combining a native chromagram/rhythm analysis
//! pipeline with independent external lookups, rendered as a DJ/producer
//! recommendation.
//!
//! ## Pipeline
//!
//! ```text
//! audio bytes ─ decode ─ frame chromagrams ─ key estimator ─┐
//! audio bytes ─ rhythm extractor ─ tempo estimate ──────────┤─ fusion ─ cache
//! title/artist ─ lookup aggregator ─ lookup records ────────┘
//! ```
//!
//! Native analysis and lookups run concurrently; every sub-path failure is
//! absorbed into "no data" before fusion, so [`AnalysisEngine::analyze`]
//! always returns a usable result.
//!
//! ## Quick start
//!
//! ```no_run
//! use mixkey_engine::{AnalysisEngine, EngineConfig, ResultCache};
//! use std::sync::Arc;
//!
//! # async fn run(decoder: Arc<dyn mixkey_engine::dsp::AudioDecoder>,
//! #              chroma: Arc<dyn mixkey_engine::dsp::ChromaExtractor>,
//! #              rhythm: Arc<dyn mixkey_engine::dsp::tempo::RhythmExtractor>) {
//! let engine = AnalysisEngine::new(
//!     decoder,
//!     chroma,
//!     rhythm,
//!     vec![],
//!     Arc::new(ResultCache::new()),
//!     EngineConfig::default(),
//! );
//!
//! let bundle = engine.analyze(&[], "Strobe", Some("deadmau5")).await;
//! println!(
//!     "{} @ {} BPM ({}) - {}",
//!     bundle.fusion.key, bundle.fusion.bpm,
//!     bundle.fusion.tier.as_str(), bundle.fusion.recommendation
//! );
//! # }
//! ```

pub mod cache;
pub mod camelot;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod lookup;
pub mod types;

pub use cache::{Fingerprint, ResultCache};
pub use config::EngineConfig;
pub use engine::AnalysisEngine;
pub use error::EngineError;
pub use types::{
    AnalysisBundle, ConfidenceTier, DetectionMethod, FusionResult, KeyEstimate, LookupRecord,
    NativeAnalysis, TempoEstimate,
};
