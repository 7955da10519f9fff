//! Result fusion policy
//!
//! One pure decision per request: reconcile the native analysis with
//! external lookup records under a confidence threshold. First matching
//! rule wins; later rules are fallbacks only, never overrides.

use crate::camelot;
use crate::lookup::best_of;
use crate::types::{ConfidenceTier, DetectionMethod, FusionResult, LookupRecord, NativeAnalysis};
use tracing::debug;

/// Fuse native and lookup inputs into the final result
///
/// Decision order:
/// 1. Both native confidences strictly above `threshold` → `native_high`.
/// 2. Any native result at all → `native_fallback` at a fixed `medium` tier.
/// 3. No native result, best lookup record → `lookup` at `medium`.
/// 4. Nothing → `none` at `low`.
///
/// Rules 1 and 2 together mean lookup data is never consulted once any
/// native result exists, even when a lookup source is highly confident and
/// the native confidence is near zero. This trust ordering (native analysis
/// over scraped data) is intentional compatibility behavior; do not replace
/// it with a confidence-weighted comparison.
pub fn fuse(
    native: Option<&NativeAnalysis>,
    records: &[LookupRecord],
    threshold: f32,
) -> FusionResult {
    let mut notes = Vec::new();

    if let Some(native) = native {
        let key_conf = native.key.confidence;
        let tempo_conf = native.tempo.confidence;

        if key_conf > threshold && tempo_conf > threshold {
            notes.push(format!(
                "native key confidence {:.2} and tempo confidence {:.2} above threshold {:.2}",
                key_conf, tempo_conf, threshold
            ));
            return finish(
                native.key.key.clone(),
                native.tempo.bpm,
                ConfidenceTier::High,
                DetectionMethod::NativeHigh,
                notes,
            );
        }

        notes.push(format!(
            "native confidence (key {:.2}, tempo {:.2}) below threshold {:.2}; keeping native result",
            key_conf, tempo_conf, threshold
        ));
        if !records.is_empty() {
            notes.push(format!(
                "{} lookup record(s) available but not consulted while a native result exists",
                records.len()
            ));
        }
        return finish(
            native.key.key.clone(),
            native.tempo.bpm,
            ConfidenceTier::Medium,
            DetectionMethod::NativeFallback,
            notes,
        );
    }

    if let Some(record) = best_of(records) {
        notes.push(format!(
            "no native result; using lookup from {} (tier {})",
            record.source,
            record.tier.as_str()
        ));
        return finish(
            record.key.clone().unwrap_or_else(|| "Unknown".to_string()),
            record.bpm.unwrap_or(0),
            ConfidenceTier::Medium,
            DetectionMethod::Lookup,
            notes,
        );
    }

    notes.push("no native analysis and no lookup data".to_string());
    finish(
        "Unknown".to_string(),
        0,
        ConfidenceTier::Low,
        DetectionMethod::None,
        notes,
    )
}

fn finish(
    key: String,
    bpm: u32,
    tier: ConfidenceTier,
    method: DetectionMethod,
    notes: Vec<String>,
) -> FusionResult {
    debug!(
        "Fusion decision: {:?} -> {} @ {} BPM ({})",
        method,
        key,
        bpm,
        tier.as_str()
    );
    FusionResult {
        camelot: camelot::from_key_name(&key),
        recommendation: tier.recommendation().to_string(),
        key,
        bpm,
        tier,
        method,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyEstimate, TempoEstimate};
    use std::collections::HashMap;

    fn native(key_conf: f32, tempo_conf: f32) -> NativeAnalysis {
        NativeAnalysis {
            key: KeyEstimate {
                key: "A minor".to_string(),
                confidence: key_conf,
                correlations: HashMap::new(),
            },
            tempo: TempoEstimate {
                bpm: 124,
                confidence: tempo_conf,
            },
        }
    }

    fn lookup(source: &str, key: &str, bpm: u32, tier: ConfidenceTier) -> LookupRecord {
        LookupRecord {
            key: Some(key.to_string()),
            bpm: Some(bpm),
            source: source.to_string(),
            tier,
        }
    }

    #[test]
    fn high_native_confidence_wins_rule_one() {
        let native = native(0.9, 0.9);
        let result = fuse(Some(&native), &[], 0.85);
        assert_eq!(result.method, DetectionMethod::NativeHigh);
        assert_eq!(result.tier, ConfidenceTier::High);
        assert_eq!(result.key, "A minor");
        assert_eq!(result.bpm, 124);
        assert_eq!(result.recommendation, "safe to use for mixing/production");
    }

    #[test]
    fn weak_native_still_beats_confident_lookup() {
        // Lookup data is never consulted while any native result exists,
        // even when the lookup source is highly confident.
        let native = native(0.5, 0.5);
        let records = vec![lookup("web", "D minor", 128, ConfidenceTier::High)];
        let result = fuse(Some(&native), &records, 0.85);
        assert_eq!(result.method, DetectionMethod::NativeFallback);
        assert_eq!(result.tier, ConfidenceTier::Medium);
        assert_eq!(result.key, "A minor");
        assert_eq!(result.bpm, 124);
    }

    #[test]
    fn both_confidences_must_exceed_the_threshold() {
        let native = native(0.95, 0.3);
        let result = fuse(Some(&native), &[], 0.85);
        assert_eq!(result.method, DetectionMethod::NativeFallback);

        let native = self::native(0.3, 0.95);
        let result = fuse(Some(&native), &[], 0.85);
        assert_eq!(result.method, DetectionMethod::NativeFallback);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let native = native(0.85, 0.85);
        let result = fuse(Some(&native), &[], 0.85);
        assert_eq!(result.method, DetectionMethod::NativeFallback);
    }

    #[test]
    fn fallback_tier_is_fixed_at_medium() {
        // Tier comes from the rule, not from the numeric confidence
        let native = native(0.01, 0.01);
        let result = fuse(Some(&native), &[], 0.85);
        assert_eq!(result.tier, ConfidenceTier::Medium);
        assert_eq!(result.recommendation, "verify with your ears");
    }

    #[test]
    fn lookup_rule_selects_highest_tier() {
        let records = vec![
            lookup("A", "C major", 120, ConfidenceTier::Medium),
            lookup("B", "D minor", 128, ConfidenceTier::High),
        ];
        let result = fuse(None, &records, 0.85);
        assert_eq!(result.method, DetectionMethod::Lookup);
        assert_eq!(result.tier, ConfidenceTier::Medium);
        assert_eq!(result.key, "D minor");
        assert_eq!(result.bpm, 128);
    }

    #[test]
    fn nothing_at_all_yields_the_low_terminal_state() {
        let result = fuse(None, &[], 0.85);
        assert_eq!(result.method, DetectionMethod::None);
        assert_eq!(result.tier, ConfidenceTier::Low);
        assert_eq!(result.key, "Unknown");
        assert_eq!(result.bpm, 0);
        assert_eq!(result.recommendation, "manual verification recommended");
    }

    #[test]
    fn lookup_record_without_fields_degrades_gracefully() {
        let records = vec![LookupRecord {
            key: None,
            bpm: None,
            source: "sparse".to_string(),
            tier: ConfidenceTier::High,
        }];
        let result = fuse(None, &records, 0.85);
        assert_eq!(result.method, DetectionMethod::Lookup);
        assert_eq!(result.key, "Unknown");
        assert_eq!(result.bpm, 0);
    }

    #[test]
    fn camelot_alias_follows_the_fused_key() {
        let native = native(0.9, 0.9);
        let result = fuse(Some(&native), &[], 0.85);
        assert_eq!(result.camelot.as_deref(), Some("8A"));

        let result = fuse(None, &[], 0.85);
        assert!(result.camelot.is_none());
    }

    #[test]
    fn notes_mention_ignored_lookup_records() {
        let native = native(0.5, 0.5);
        let records = vec![lookup("web", "D minor", 128, ConfidenceTier::High)];
        let result = fuse(Some(&native), &records, 0.85);
        assert!(result
            .notes
            .iter()
            .any(|n| n.contains("not consulted")));
    }
}
