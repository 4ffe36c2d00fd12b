//! Concrete evidence sources.
//!
//! | source | upstream |
//! |---|---|
//! | [`KnowledgeSource`] | generative model, trained knowledge only |
//! | [`SearchGroundedSource`] | generative model with web search grounding |
//! | [`StoreSource`] | curated trope store over HTTP |

pub mod knowledge;
pub mod prompt;
pub mod search;
pub mod store;

pub use knowledge::KnowledgeSource;
pub use search::SearchGroundedSource;
pub use store::StoreSource;
