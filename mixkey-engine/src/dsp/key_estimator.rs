//! Key estimation over a sequence of frame chromagrams
//!
//! Averages the frames first and classifies the mean, rather than
//! classifying per frame and averaging, so transient frame-level noise is
//! smoothed before classification.

use super::classifier::classify;
use super::profiles::KeyProfileTable;
use crate::types::KeyEstimate;
use tracing::{debug, warn};

/// Estimate the key from per-frame chromagrams
///
/// Frames that are not exactly 12 elements long are skipped, not errored.
/// With zero valid frames this degrades to `{key: "Unknown", confidence: 0}`
/// rather than failing.
pub fn estimate_key(frames: &[Vec<f32>]) -> KeyEstimate {
    let mut sum = [0.0f32; 12];
    let mut valid = 0usize;

    for frame in frames {
        if frame.len() != 12 {
            warn!("Skipping chromagram frame with {} bins", frame.len());
            continue;
        }
        for (acc, value) in sum.iter_mut().zip(frame.iter()) {
            *acc += value;
        }
        valid += 1;
    }

    if valid == 0 {
        debug!("No valid chromagram frames, reporting Unknown key");
        return KeyEstimate::unknown();
    }

    let mut mean = sum;
    for bin in mean.iter_mut() {
        *bin /= valid as f32;
    }

    let classification = classify(&mean, KeyProfileTable::shared());
    debug!(
        "Key estimate from {} frames: {} ({:.3})",
        valid, classification.key, classification.confidence
    );

    KeyEstimate {
        key: classification.key,
        confidence: classification.confidence,
        correlations: classification.correlations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_frames_reports_unknown() {
        let estimate = estimate_key(&[]);
        assert_eq!(estimate.key, "Unknown");
        assert_eq!(estimate.confidence, 0.0);
        assert!(estimate.correlations.is_empty());
    }

    #[test]
    fn only_invalid_frames_reports_unknown() {
        let frames = vec![vec![1.0; 5], vec![0.5; 13], vec![]];
        let estimate = estimate_key(&frames);
        assert_eq!(estimate.key, "Unknown");
        assert_eq!(estimate.confidence, 0.0);
    }

    #[test]
    fn invalid_frames_are_excluded_from_the_mean() {
        let valid = vec![
            5.0, 0.2, 4.0, 0.1, 4.5, 4.0, 0.3, 5.0, 0.2, 4.0, 0.1, 3.5,
        ];
        let mixed = vec![valid.clone(), vec![9.0; 5]];

        let from_mixed = estimate_key(&mixed);
        let from_single = estimate_key(&[valid]);

        // One valid frame plus one malformed frame must equal classifying
        // the single valid frame directly.
        assert_eq!(from_mixed.key, from_single.key);
        assert_eq!(from_mixed.confidence, from_single.confidence);
    }

    #[test]
    fn repeated_frames_average_to_the_same_key() {
        let frame = vec![
            5.0, 0.2, 4.0, 0.1, 4.5, 4.0, 0.3, 5.0, 0.2, 4.0, 0.1, 3.5,
        ];
        let single = estimate_key(&[frame.clone()]);
        let repeated = estimate_key(&vec![frame; 10]);
        assert_eq!(single.key, repeated.key);
    }
}
