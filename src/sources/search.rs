//! Evidence from a generative model grounded in live web search.

use std::sync::Arc;

use async_trait::async_trait;
use trope_fusion::{EvidenceSource, Normalizer, SourceError, SourceResult, SourceTag};

use crate::extraction::parse_model_reply;
use crate::generative::{GenerativeClient, Grounding};

use super::prompt::search_prompt;

/// Asks a search-grounded generative model which tropes reviewers and
/// readers associate with a book.
#[derive(Debug)]
pub struct SearchGroundedSource {
    client: Arc<GenerativeClient>,
    model: String,
    normalizer: Arc<Normalizer>,
}

impl SearchGroundedSource {
    pub fn new(
        client: Arc<GenerativeClient>,
        model: impl Into<String>,
        normalizer: Arc<Normalizer>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            normalizer,
        }
    }
}

#[async_trait]
impl EvidenceSource for SearchGroundedSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Search
    }

    async fn fetch(&self, title: &str, author: &str) -> Result<SourceResult, SourceError> {
        let prompt = search_prompt(title, author, self.normalizer.vocabulary());
        let reply = self
            .client
            .generate(&self.model, &prompt, Grounding::GoogleSearch)
            .await?;
        let pairs = parse_model_reply(&reply)?;
        tracing::debug!(count = pairs.len(), "search-grounded reply parsed");
        Ok(self.normalizer.collect(self.tag(), pairs))
    }
}
