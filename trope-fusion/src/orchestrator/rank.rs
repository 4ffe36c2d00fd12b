//! Deterministic ranking of fused tropes.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::AggregatedTrope;

/// Sort tropes by confidence descending and keep the first `top_n`.
///
/// Ties are broken by first discovery, earliest first, so the output does
/// not depend on map iteration order. A `top_n` of zero or less yields an
/// empty list.
pub fn rank(tropes: HashMap<String, AggregatedTrope>, top_n: i64) -> Vec<AggregatedTrope> {
    if top_n <= 0 {
        return Vec::new();
    }

    let mut ranked: Vec<AggregatedTrope> = tropes.into_values().collect();
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then(a.first_seen_order.cmp(&b.first_seen_order))
    });
    ranked.truncate(usize::try_from(top_n).unwrap_or(usize::MAX));
    ranked
}
