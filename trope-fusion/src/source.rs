//! Trait definition for pluggable evidence sources.
//!
//! Each source (model knowledge, search-grounded model, curated store)
//! implements [`EvidenceSource`] so the orchestrator can fan out to them
//! without knowing which concrete backend it is talking to.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::{SourceResult, SourceTag};

/// A pluggable evidence source.
///
/// Implementors query their upstream for tropes in a book, normalize every
/// label they extract, and return the result keyed by canonical name.
/// Failures are returned as [`SourceError`]; the orchestrator turns them
/// into an empty contribution.
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Which source this implementation represents.
    fn tag(&self) -> SourceTag;

    /// Weight applied to this source's confidences during aggregation.
    ///
    /// Typically delegates to [`SourceTag::weight()`].
    fn weight(&self) -> f64 {
        self.tag().weight()
    }

    /// Fetch trope evidence for a book.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the upstream call fails, times out, or
    /// answers with something that cannot be read as trope evidence.
    async fn fetch(&self, title: &str, author: &str) -> Result<SourceResult, SourceError>;
}
