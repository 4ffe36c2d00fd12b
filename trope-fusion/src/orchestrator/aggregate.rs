//! Weighted cross-source aggregation.
//!
//! Each label's fused confidence is the mean of its weighted confidences
//! plus a bonus for being reported by more than one source:
//!
//! ```text
//! base  = sum(confidence * weight) / count
//! bonus = min(0.2, (count - 1) * 0.1)
//! final = min(1.0, base + bonus)
//! ```
//!
//! Labels are numbered in the order they are first met across the fold;
//! ranking uses that number to break confidence ties.

use std::collections::HashMap;

use crate::types::{AggregatedTrope, SourceResult};

/// Bonus per additional contributing source.
const BONUS_PER_SOURCE: f64 = 0.1;

/// Cap on the multi-source bonus.
const MAX_BONUS: f64 = 0.2;

/// Bonus for a label reported by `count` sources.
pub fn source_bonus(count: usize) -> f64 {
    (count.saturating_sub(1) as f64 * BONUS_PER_SOURCE).min(MAX_BONUS)
}

/// Fused confidence from a weighted sum over `count` sources.
///
/// Returns 0.0 when `count` is zero.
pub fn fused_confidence(weighted_sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let base = weighted_sum / count as f64;
    (base + source_bonus(count)).clamp(0.0, 1.0)
}

#[derive(Debug)]
struct Accumulator {
    weighted_sum: f64,
    trope: AggregatedTrope,
}

/// Fold `(result, weight)` pairs into one [`AggregatedTrope`] per label.
///
/// Pairs are folded in slice order, so callers pass them in fold order
/// (knowledge, search, store). A source's tag is appended to a trope's
/// `sources` once per result that mentions the label.
pub fn aggregate(results: &[(SourceResult, f64)]) -> HashMap<String, AggregatedTrope> {
    let mut acc: HashMap<String, Accumulator> = HashMap::new();
    let mut next_order = 0usize;

    for (result, weight) in results {
        for (label, evidence) in result.iter() {
            let entry = acc.entry(label.to_owned()).or_insert_with(|| {
                let order = next_order;
                next_order += 1;
                Accumulator {
                    weighted_sum: 0.0,
                    trope: AggregatedTrope {
                        name: label.to_owned(),
                        confidence: 0.0,
                        sources: Vec::new(),
                        first_seen_order: order,
                    },
                }
            });
            entry.weighted_sum += evidence.confidence * weight;
            entry.trope.sources.push(evidence.source);
        }
    }

    acc.into_iter()
        .map(|(label, Accumulator { weighted_sum, mut trope })| {
            trope.confidence = fused_confidence(weighted_sum, trope.sources.len());
            (label, trope)
        })
        .collect()
}
