//! # trope-fusion
//!
//! Multi-source evidence fusion for book trope identification.
//!
//! Given a book's title and author, this crate asks several evidence
//! sources which narrative tropes the book uses, maps their free-text
//! labels onto a canonical vocabulary, fuses per-label confidences across
//! sources, and returns a ranked, truncated list.
//!
//! ## Design
//!
//! - Sources implement [`EvidenceSource`]; the crate ships none of its own
//! - Sources run concurrently, each under its own time budget
//! - Results fold in a fixed order (knowledge, search, store) so ranking
//!   ties break the same way on every run
//! - Graceful degradation: a failing or slow source contributes nothing,
//!   and the request still succeeds
//!
//! ## Privacy
//!
//! - Titles and authors are logged only at debug level

pub mod config;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod source;
pub mod types;
pub mod vocabulary;

use std::sync::Arc;

pub use config::{FusionConfig, DEFAULT_TOP_N};
pub use error::{FusionError, Result, SourceError};
pub use normalize::Normalizer;
pub use orchestrator::fanout::{SourceOutcome, SourceReport};
pub use orchestrator::identify::Identification;
pub use source::EvidenceSource;
pub use types::{AggregatedTrope, Evidence, SourceResult, SourceTag};
pub use vocabulary::{CanonicalVocabulary, DEFAULT_TROPES};

/// Identify the top tropes in a book from the given sources.
///
/// Returns at most `top_n` tropes ordered by fused confidence.
///
/// # Errors
///
/// Returns [`FusionError::Config`] if `config` is invalid, or
/// [`FusionError::Internal`] if a source task panics. Individual source
/// failures are logged and do not fail the call.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # async fn example(sources: Vec<Arc<dyn trope_fusion::EvidenceSource>>) -> trope_fusion::Result<()> {
/// let config = trope_fusion::FusionConfig::default();
/// let tropes = trope_fusion::identify(&sources, "Mistborn", "Brandon Sanderson", 5, &config).await?;
/// for trope in &tropes {
///     println!("{}: {:.2}", trope.name, trope.confidence);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn identify(
    sources: &[Arc<dyn EvidenceSource>],
    title: &str,
    author: &str,
    top_n: i64,
    config: &FusionConfig,
) -> Result<Vec<AggregatedTrope>> {
    Ok(identify_detailed(sources, title, author, top_n, config)
        .await?
        .tropes)
}

/// Like [`identify`], but also returns each source's outcome.
///
/// # Errors
///
/// Same as [`identify`].
pub async fn identify_detailed(
    sources: &[Arc<dyn EvidenceSource>],
    title: &str,
    author: &str,
    top_n: i64,
    config: &FusionConfig,
) -> Result<Identification> {
    config.validate()?;
    orchestrator::identify::orchestrate_identification(sources, title, author, top_n, config).await
}
