//! Score Aggregation
//!
//! Per-trait arithmetic mean across a subject's predictions.

use crate::traits::{AggregatedScores, TraitScores, TRAIT_COUNT};

/// Mean of `vectors`, or `None` (insufficient data) when there are none.
pub fn aggregate(vectors: &[TraitScores]) -> Option<AggregatedScores> {
    if vectors.is_empty() {
        return None;
    }

    let mut totals = [0.0f64; TRAIT_COUNT];
    for v in vectors {
        for (total, value) in totals.iter_mut().zip(v.to_array()) {
            *total += value;
        }
    }
    let count = vectors.len() as f64;
    let means = totals.map(|t| t / count);

    Some(AggregatedScores {
        scores: TraitScores::from_array(means),
        sample_count: vectors.len(),
    })
}
