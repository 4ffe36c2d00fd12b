//! Evidence from a generative model's trained knowledge.

use std::sync::Arc;

use async_trait::async_trait;
use trope_fusion::{EvidenceSource, Normalizer, SourceError, SourceResult, SourceTag};

use crate::extraction::parse_model_reply;
use crate::generative::{GenerativeClient, Grounding};

use super::prompt::knowledge_prompt;

/// Asks a generative model, without tools, which tropes a book uses.
#[derive(Debug)]
pub struct KnowledgeSource {
    client: Arc<GenerativeClient>,
    model: String,
    normalizer: Arc<Normalizer>,
}

impl KnowledgeSource {
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
impl EvidenceSource for KnowledgeSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Knowledge
    }

    async fn fetch(&self, title: &str, author: &str) -> Result<SourceResult, SourceError> {
        let prompt = knowledge_prompt(title, author, self.normalizer.vocabulary());
        let reply = self
            .client
            .generate(&self.model, &prompt, Grounding::None)
            .await?;
        let pairs = parse_model_reply(&reply)?;
        Ok(self.normalizer.collect(self.tag(), pairs))
    }
}
