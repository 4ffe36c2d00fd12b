//! Concurrent source fan-out with per-source time budgets.
//!
//! Every source runs in its own task. A source that errors or overruns its
//! budget contributes an empty result; only a task that panics aborts the
//! fan-out. Reports come back in fold order no matter which source
//! finished first. Dropping the fan-out aborts any source still running.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};

use crate::config::FusionConfig;
use crate::error::FusionError;
use crate::source::EvidenceSource;
use crate::types::{SourceResult, SourceTag};

/// What happened when one source was asked for evidence.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    /// The source answered in time.
    Evidence(SourceResult),
    /// The source returned an error.
    Failed(String),
    /// The source did not answer within its budget.
    TimedOut(Duration),
}

impl SourceOutcome {
    /// The evidence to fold for this outcome; empty unless the source answered.
    pub fn into_result(self) -> SourceResult {
        match self {
            Self::Evidence(result) => result,
            Self::Failed(_) | Self::TimedOut(_) => SourceResult::new(),
        }
    }

    pub fn is_evidence(&self) -> bool {
        matches!(self, Self::Evidence(_))
    }
}

/// Outcome of one source call, with the weight to fold it under.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub tag: SourceTag,
    pub weight: f64,
    pub outcome: SourceOutcome,
}

impl SourceReport {
    /// Split into the `(result, weight)` pair the aggregator consumes.
    pub fn into_weighted(self) -> (SourceResult, f64) {
        (self.outcome.into_result(), self.weight)
    }
}

/// Query every source concurrently and collect their outcomes.
///
/// # Errors
///
/// Returns [`FusionError::Internal`] if a source task panics. Source
/// errors and timeouts are not errors here; they are reported in the
/// returned [`SourceReport`]s.
pub async fn fan_out(
    sources: &[Arc<dyn EvidenceSource>],
    title: &str,
    author: &str,
    config: &FusionConfig,
) -> Result<Vec<SourceReport>, FusionError> {
    let handles: Vec<_> = sources
        .iter()
        .map(|source| {
            let source = Arc::clone(source);
            let title = title.to_owned();
            let author = author.to_owned();
            let budget = config.timeout_for(source.tag());
            FetchTask(tokio::spawn(async move {
                guarded_fetch(source.as_ref(), &title, &author, budget).await
            }))
        })
        .collect();

    let joined = futures::future::join_all(handles).await;

    let mut reports = Vec::with_capacity(sources.len());
    for (source, outcome) in sources.iter().zip(joined) {
        let tag = source.tag();
        let outcome = outcome.map_err(|e| {
            tracing::error!(source = %tag, error = %e, "evidence source task aborted");
            FusionError::Internal(format!("{tag} source task failed: {e}"))
        })?;
        reports.push(SourceReport {
            tag,
            weight: source.weight(),
            outcome,
        });
    }

    // Fold order is fixed by tag, not by how the caller listed the sources.
    reports.sort_by_key(|report| fold_position(report.tag));
    Ok(reports)
}

/// Call one source under its time budget, absorbing failures.
pub async fn guarded_fetch(
    source: &dyn EvidenceSource,
    title: &str,
    author: &str,
    budget: Duration,
) -> SourceOutcome {
    let tag = source.tag();
    match tokio::time::timeout(budget, source.fetch(title, author)).await {
        Ok(Ok(result)) => {
            tracing::debug!(source = %tag, count = result.len(), "source returned evidence");
            SourceOutcome::Evidence(result)
        }
        Ok(Err(err)) => {
            tracing::warn!(source = %tag, error = %err, "evidence source failed");
            SourceOutcome::Failed(err.to_string())
        }
        Err(_) => {
            tracing::warn!(
                source = %tag,
                budget_secs = budget.as_secs_f64(),
                "evidence source timed out"
            );
            SourceOutcome::TimedOut(budget)
        }
    }
}

/// A spawned source call that is aborted if dropped before it finishes.
struct FetchTask(JoinHandle<SourceOutcome>);

impl Future for FetchTask {
    type Output = Result<SourceOutcome, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn fold_position(tag: SourceTag) -> usize {
    SourceTag::all()
        .iter()
        .position(|t| *t == tag)
        .unwrap_or(usize::MAX)
}
