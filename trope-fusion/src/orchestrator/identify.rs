//! The identification pipeline: fan out, aggregate, rank.

use std::sync::Arc;

use crate::config::FusionConfig;
use crate::error::FusionError;
use crate::source::EvidenceSource;
use crate::types::AggregatedTrope;

use super::aggregate::aggregate;
use super::fanout::{fan_out, SourceReport};
use super::rank::rank;

/// Ranked tropes for one book, with the per-source outcomes behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub tropes: Vec<AggregatedTrope>,
    pub reports: Vec<SourceReport>,
}

/// Run the full pipeline for one book.
///
/// # Pipeline
///
/// 1. Query every source concurrently, each under its own time budget
/// 2. Log source failures and timeouts at warn level; they contribute nothing
/// 3. Fold results in the order knowledge, search, store
/// 4. Fuse per-label confidences with the multi-source bonus
/// 5. Sort by confidence, ties by first discovery
/// 6. Truncate to `top_n`
///
/// # Errors
///
/// Returns [`FusionError::Internal`] if a source task panics. A request
/// where every source fails is still a success with no tropes.
pub async fn orchestrate_identification(
    sources: &[Arc<dyn EvidenceSource>],
    title: &str,
    author: &str,
    top_n: i64,
    config: &FusionConfig,
) -> Result<Identification, FusionError> {
    tracing::debug!(title, author, top_n, "identifying tropes");

    let reports = fan_out(sources, title, author, config).await?;

    let answered = reports.iter().filter(|r| r.outcome.is_evidence()).count();
    if answered < reports.len() {
        tracing::info!(
            answered,
            total = reports.len(),
            "continuing with partial evidence"
        );
    }

    let weighted: Vec<_> = reports
        .iter()
        .cloned()
        .map(SourceReport::into_weighted)
        .collect();
    let fused = aggregate(&weighted);
    let tropes = rank(fused, top_n);

    tracing::debug!(count = tropes.len(), "identification complete");
    Ok(Identification { tropes, reports })
}
