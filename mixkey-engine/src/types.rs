//! Core types for the detection & fusion engine
//!
//! Everything here is a value type produced and consumed within a single
//! analysis request. Nothing is shared across concurrent requests except
//! through the result cache, which stores completed [`AnalysisBundle`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key estimate produced by the native chromagram path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Detected key name, e.g. "A minor", or "Unknown"
    pub key: String,

    /// Classification confidence (0.0-1.0); negative correlations report 0.0
    pub confidence: f32,

    /// Pearson correlation against every key profile, keyed by profile name
    pub correlations: HashMap<String, f32>,
}

impl KeyEstimate {
    /// Degenerate estimate for inputs with no usable frames
    pub fn unknown() -> Self {
        Self {
            key: "Unknown".to_string(),
            confidence: 0.0,
            correlations: HashMap::new(),
        }
    }
}

/// Tempo estimate produced by the rhythm extractor boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Beats per minute, rounded to the nearest integer
    pub bpm: u32,

    /// Extractor confidence (0.0-1.0)
    pub confidence: f32,
}

impl TempoEstimate {
    /// Silent estimate reported when the rhythm extractor fails
    pub fn silent() -> Self {
        Self {
            bpm: 0,
            confidence: 0.0,
        }
    }
}

/// Combined output of the native analysis path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeAnalysis {
    /// Key estimate from the chromagram classifier
    pub key: KeyEstimate,
    /// Tempo estimate from the rhythm extractor
    pub tempo: TempoEstimate,
}

/// Coarse confidence classification attached to a final result
///
/// Distinct from the raw numeric confidence scores carried by the native
/// estimates. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// Manual verification recommended
    Low,
    /// Verify with your ears
    Medium,
    /// Safe to use for mixing/production
    High,
}

impl ConfidenceTier {
    /// String form used in rendered output
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }

    /// DJ/producer-facing recommendation derived purely from the tier
    pub fn recommendation(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "safe to use for mixing/production",
            ConfidenceTier::Medium => "verify with your ears",
            ConfidenceTier::Low => "manual verification recommended",
        }
    }
}

/// Normalized answer from one external lookup source
///
/// One record per source that responded; records are never merged or
/// deduplicated across sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRecord {
    /// Key as reported by the source, normalized where recognizable
    pub key: Option<String>,

    /// BPM as reported by the source
    pub bpm: Option<u32>,

    /// Source identifier for provenance
    pub source: String,

    /// Source-assigned confidence tier
    pub tier: ConfidenceTier,
}

/// How the final result was decided
///
/// Closed union so fusion rule precedence is exhaustively matchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Native analysis with both confidences above threshold
    NativeHigh,
    /// Native analysis below threshold, still preferred over lookups
    NativeFallback,
    /// No native result; best lookup record used
    Lookup,
    /// Nothing produced a result
    None,
}

/// Final fused answer, the externally visible artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    /// Final key, or "Unknown"
    pub key: String,

    /// Final BPM, or 0
    pub bpm: u32,

    /// Coarse confidence tier
    pub tier: ConfidenceTier,

    /// Decision path that produced this result
    pub method: DetectionMethod,

    /// Ordered human-readable notes about the decision
    pub notes: Vec<String>,

    /// Recommendation text derived from the tier
    pub recommendation: String,

    /// Camelot wheel alias for the final key, when recognizable
    pub camelot: Option<String>,
}

/// Full per-track analysis bundle retained for inspection and caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisBundle {
    /// Native key estimate, absent if the native path failed
    pub native_key: Option<KeyEstimate>,

    /// Native tempo estimate, absent if the native path failed
    pub native_tempo: Option<TempoEstimate>,

    /// Lookup records in configured source priority order
    pub lookup_records: Vec<LookupRecord>,

    /// Fused final result
    pub fusion: FusionResult,

    /// When the analysis completed
    pub analyzed_at: DateTime<Utc>,
}
