//! Error types for the trope-fusion crate.
//!
//! Source failures and fusion failures are kept apart: a [`SourceError`]
//! only ever removes one source's evidence from a request, while a
//! [`FusionError`] means the request itself could not be answered.

/// Failure of a single evidence source call.
///
/// Sources return this instead of panicking. The fan-out logs it and
/// substitutes an empty result, so it never reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request to the upstream service failed or returned a
    /// non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The source did not answer within its time budget.
    #[error("source timed out: {0}")]
    Timeout(String),

    /// The upstream reply could not be parsed into trope evidence.
    #[error("parse error: {0}")]
    Parse(String),

    /// The upstream service answered but reported an error of its own.
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Errors that abort a fusion request.
#[derive(Debug, thiserror::Error)]
pub enum FusionError {
    /// Invalid fusion configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An unexpected fault while fusing evidence, such as a source task
    /// that panicked.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for trope-fusion results.
pub type Result<T> = std::result::Result<T, FusionError>;
