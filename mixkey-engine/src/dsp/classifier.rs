//! Correlation-based key classification
//!
//! Scores an averaged chromagram against all 24 key profiles using the
//! Pearson correlation coefficient and picks the best match.

use super::profiles::KeyProfileTable;
use std::collections::HashMap;
use tracing::debug;

/// Outcome of classifying one chromagram
#[derive(Debug, Clone)]
pub struct Classification {
    /// Best-matching profile name
    pub key: String,

    /// `max(0, r)` of the winning correlation
    pub confidence: f32,

    /// Correlation for every profile, keyed by profile name
    pub correlations: HashMap<String, f32>,
}

/// Classify a chromagram against the key profile table
///
/// Profiles are scored in the table's fixed iteration order; the first
/// profile with the strictly greatest correlation wins, so ties resolve
/// deterministically across runs. Negative winning correlations are
/// reported as zero confidence.
pub fn classify(chroma: &[f32; 12], table: &KeyProfileTable) -> Classification {
    let mut correlations = HashMap::with_capacity(24);
    let mut best_name: &str = "";
    let mut best_r = f64::NEG_INFINITY;

    for profile in table.profiles() {
        let r = pearson(chroma, &profile.template);
        correlations.insert(profile.name.clone(), r as f32);

        // Strictly greater: later profiles never displace an equal score
        if r > best_r {
            best_r = r;
            best_name = &profile.name;
        }
    }

    debug!("Best key match: {} (r={:.3})", best_name, best_r);

    Classification {
        key: best_name.to_string(),
        confidence: best_r.max(0.0) as f32,
        correlations,
    }
}

/// Pearson correlation coefficient over the 12 pitch classes
///
/// Returns 0.0 when either vector has zero variance, so flat or empty
/// input never wins by a division artifact.
fn pearson(x: &[f32; 12], y: &[f32; 12]) -> f64 {
    let n = 12.0f64;

    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut sum_xy = 0.0f64;
    let mut sum_x2 = 0.0f64;
    let mut sum_y2 = 0.0f64;

    for i in 0..12 {
        let xi = x[i] as f64;
        let yi = y[i] as f64;
        sum_x += xi;
        sum_y += yi;
        sum_xy += xi * yi;
        sum_x2 += xi * xi;
        sum_y2 += yi * yi;
    }

    let var_x = sum_x2 - sum_x * sum_x / n;
    let var_y = sum_y2 - sum_y * sum_y / n;

    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }

    (sum_xy - sum_x * sum_y / n) / (var_x * var_y).sqrt()
}
