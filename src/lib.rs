//! Librarian: multi-source literary trope identification for books.
//!
//! Given a title and author, the agent asks three evidence sources which
//! tropes the book uses and fuses their answers into one ranked list:
//!
//! - **Knowledge**: a generative model answering from trained knowledge
//! - **Search**: the same API with live web search grounding
//! - **Store**: a curated trope store queried over HTTP
//!
//! Normalization, fan-out, aggregation, and ranking live in the
//! [`trope_fusion`] crate; this crate supplies the concrete sources, the
//! request/response envelope, configuration, and the `librarian-host`
//! stdin/stdout bridge.

pub mod agent;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extraction;
pub mod generative;
pub mod host;
pub mod sources;

pub use agent::TropeAgent;
pub use config::LibrarianConfig;
pub use envelope::{Request, Response};
pub use error::{LibrarianError, Result};
