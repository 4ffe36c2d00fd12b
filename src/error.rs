//! Error types for the librarian agent.

/// Top-level error type for the trope agent and its host bridge.
#[derive(Debug, thiserror::Error)]
pub enum LibrarianError {
    /// Configuration error (missing API key, store URL, bad config file).
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Evidence fusion error.
    #[error("fusion error: {0}")]
    Fusion(#[from] trope_fusion::FusionError),

    /// Host protocol error (stdin/stdout framing, response serialization).
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LibrarianError>;
