//! External lookup aggregation
//!
//! Queries each configured source independently and normalizes answers into
//! a common record shape. A failing or slow source is dropped from the
//! result sequence, never escalated; output order follows configured source
//! priority, not response latency.

pub mod http_source;

use crate::error::EngineError;
use crate::types::{ConfidenceTier, LookupRecord};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// External lookup collaborator boundary
///
/// Returns zero-or-one record per query; `Ok(None)` is a valid "no data"
/// outcome, not an error.
#[async_trait]
pub trait LookupSource: Send + Sync {
    /// Source identifier used for provenance
    fn name(&self) -> &'static str;

    /// Look up a track by title and optional artist
    async fn lookup(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> Result<Option<LookupRecord>, EngineError>;
}

/// Fan-out aggregator over configured lookup sources
pub struct LookupAggregator {
    sources: Vec<Arc<dyn LookupSource>>,
    timeout: Duration,
}

impl LookupAggregator {
    /// Create an aggregator over sources in priority order
    pub fn new(sources: Vec<Arc<dyn LookupSource>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// Query every source concurrently
    ///
    /// Results come back in configured source order. Sources that fail,
    /// time out, or have no data contribute nothing.
    pub async fn aggregate(&self, title: &str, artist: Option<&str>) -> Vec<LookupRecord> {
        let queries = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            async move {
                let outcome =
                    tokio::time::timeout(self.timeout, source.lookup(title, artist)).await;
                (source.name(), outcome)
            }
        });

        let mut records = Vec::new();
        for (name, outcome) in join_all(queries).await {
            match outcome {
                Ok(Ok(Some(mut record))) => {
                    if let Some(key) = record.key.take() {
                        record.key = Some(normalize_key_name(&key));
                    }
                    records.push(record);
                }
                Ok(Ok(None)) => {
                    debug!("Lookup source {} had no data", name);
                }
                Ok(Err(e)) => {
                    warn!("Lookup source {} failed: {}", name, e);
                }
                Err(_) => {
                    warn!("Lookup source {} timed out after {:?}", name, self.timeout);
                }
            }
        }

        records
    }
}

/// Select the record with the highest confidence tier
///
/// Strict ordering `high > medium > low`; ties keep the first-seen record
/// in input order.
pub fn best_of(records: &[LookupRecord]) -> Option<&LookupRecord> {
    let mut best: Option<&LookupRecord> = None;
    for record in records {
        match best {
            Some(current) if record.tier <= current.tier => {}
            _ => best = Some(record),
        }
    }
    best
}

/// Normalize a source's key spelling to "<Tonic> major|minor"
///
/// Sources disagree on spellings ("Amin", "Eb", "F# Minor"). Recognizable
/// forms are normalized to sharp spellings; anything else passes through
/// untouched.
pub fn normalize_key_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();

    let letter = match chars.next() {
        Some(c) => c.to_ascii_uppercase(),
        None => return trimmed.to_string(),
    };
    let base = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return trimmed.to_string(),
    };

    let rest: String = chars.collect();
    let (accidental, quality_part) = if let Some(r) = rest.strip_prefix(['#', '♯']) {
        (1i32, r)
    } else if let Some(r) = rest.strip_prefix(['b', '♭']) {
        (-1i32, r)
    } else {
        (0i32, rest.as_str())
    };

    let quality = quality_part.trim().trim_start_matches('-').trim().to_ascii_lowercase();
    let scale = match quality.as_str() {
        "" | "maj" | "major" => "major",
        "m" | "min" | "minor" => "minor",
        _ => return trimmed.to_string(),
    };

    let pitch_class = ((base + accidental).rem_euclid(12)) as usize;
    format!(
        "{} {}",
        crate::dsp::profiles::PITCH_CLASSES[pitch_class],
        scale
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, tier: ConfidenceTier) -> LookupRecord {
        LookupRecord {
            key: Some("C major".to_string()),
            bpm: Some(120),
            source: source.to_string(),
            tier,
        }
    }

    #[test]
    fn best_of_empty_is_none() {
        assert!(best_of(&[]).is_none());
    }

    #[test]
    fn best_of_prefers_highest_tier_regardless_of_order() {
        let records = vec![
            record("A", ConfidenceTier::Medium),
            record("B", ConfidenceTier::High),
        ];
        assert_eq!(best_of(&records).unwrap().source, "B");
    }

    #[test]
    fn best_of_ties_keep_first_seen() {
        let records = vec![
            record("A", ConfidenceTier::Medium),
            record("B", ConfidenceTier::Medium),
            record("C", ConfidenceTier::Low),
        ];
        assert_eq!(best_of(&records).unwrap().source, "A");
    }

    #[test]
    fn normalizes_common_spellings() {
        assert_eq!(normalize_key_name("Amin"), "A minor");
        assert_eq!(normalize_key_name("A min"), "A minor");
        assert_eq!(normalize_key_name("a minor"), "A minor");
        assert_eq!(normalize_key_name("F# Minor"), "F# minor");
        assert_eq!(normalize_key_name("Eb"), "D# major");
        assert_eq!(normalize_key_name("Db maj"), "C# major");
        assert_eq!(normalize_key_name("Gm"), "G minor");
        assert_eq!(normalize_key_name("C"), "C major");
    }

    #[test]
    fn unrecognized_spellings_pass_through() {
        assert_eq!(normalize_key_name("8A"), "8A");
        assert_eq!(normalize_key_name("dorian"), "dorian");
        assert_eq!(normalize_key_name(""), "");
    }

    mod aggregation {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct StubSource {
            name: &'static str,
            response: Option<LookupRecord>,
            fail: bool,
            delay: Option<Duration>,
            calls: AtomicUsize,
        }

        impl StubSource {
            fn answering(name: &'static str, record: LookupRecord) -> Arc<Self> {
                Arc::new(Self {
                    name,
                    response: Some(record),
                    fail: false,
                    delay: None,
                    calls: AtomicUsize::new(0),
                })
            }

            fn failing(name: &'static str) -> Arc<Self> {
                Arc::new(Self {
                    name,
                    response: None,
                    fail: true,
                    delay: None,
                    calls: AtomicUsize::new(0),
                })
            }

            fn slow(name: &'static str, record: LookupRecord, delay: Duration) -> Arc<Self> {
                Arc::new(Self {
                    name,
                    response: Some(record),
                    fail: false,
                    delay: Some(delay),
                    calls: AtomicUsize::new(0),
                })
            }
        }

        #[async_trait]
        impl LookupSource for StubSource {
            fn name(&self) -> &'static str {
                self.name
            }

            async fn lookup(
                &self,
                _title: &str,
                _artist: Option<&str>,
            ) -> Result<Option<LookupRecord>, EngineError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                if self.fail {
                    return Err(EngineError::Lookup("boom".to_string()));
                }
                Ok(self.response.clone())
            }
        }

        #[tokio::test]
        async fn results_follow_configured_priority_order() {
            let a = StubSource::answering("A", record("A", ConfidenceTier::Low));
            let b = StubSource::slow(
                "B",
                record("B", ConfidenceTier::High),
                Duration::from_millis(20),
            );
            // B is configured first but replies last; it must still come first
            let aggregator = LookupAggregator::new(
                vec![b.clone(), a.clone()],
                Duration::from_secs(1),
            );

            let records = aggregator.aggregate("Song", None).await;
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].source, "B");
            assert_eq!(records[1].source, "A");
        }

        #[tokio::test]
        async fn failing_source_is_dropped_silently() {
            let good = StubSource::answering("good", record("good", ConfidenceTier::Medium));
            let bad = StubSource::failing("bad");
            let aggregator = LookupAggregator::new(
                vec![bad.clone(), good.clone()],
                Duration::from_secs(1),
            );

            let records = aggregator.aggregate("Song", Some("Artist")).await;
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].source, "good");
            assert_eq!(bad.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn slow_source_times_out_without_stalling_others() {
            let fast = StubSource::answering("fast", record("fast", ConfidenceTier::Low));
            let stuck = StubSource::slow(
                "stuck",
                record("stuck", ConfidenceTier::High),
                Duration::from_secs(30),
            );
            let aggregator = LookupAggregator::new(
                vec![stuck, fast],
                Duration::from_millis(50),
            );

            let records = aggregator.aggregate("Song", None).await;
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].source, "fast");
        }

        #[tokio::test]
        async fn key_spellings_are_normalized_in_records() {
            let raw = LookupRecord {
                key: Some("Abmin".to_string()),
                bpm: Some(128),
                source: "spelling".to_string(),
                tier: ConfidenceTier::Medium,
            };
            let source = StubSource::answering("spelling", raw);
            let aggregator = LookupAggregator::new(vec![source], Duration::from_secs(1));

            let records = aggregator.aggregate("Song", None).await;
            assert_eq!(records[0].key.as_deref(), Some("G# minor"));
        }
    }
}
