//! The trope agent: validates requests and runs identification.
//!
//! [`TropeAgent::process`] is the single entry point the host bridge uses.
//! It never fails: validation problems and unexpected faults both come back
//! as an error [`Response`].

use std::sync::Arc;
use std::time::Duration;

use trope_fusion::{AggregatedTrope, EvidenceSource, FusionConfig, Identification, Normalizer};

use crate::config::LibrarianConfig;
use crate::envelope::{Request, Response};
use crate::error::Result;
use crate::generative::GenerativeClient;
use crate::sources::{KnowledgeSource, SearchGroundedSource, StoreSource};

/// Identifies tropes in books from a fixed set of evidence sources.
pub struct TropeAgent {
    sources: Vec<Arc<dyn EvidenceSource>>,
    fusion: FusionConfig,
}

impl std::fmt::Debug for TropeAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tags: Vec<_> = self.sources.iter().map(|s| s.tag()).collect();
        f.debug_struct("TropeAgent")
            .field("sources", &tags)
            .field("fusion", &self.fusion)
            .finish()
    }
}

impl TropeAgent {
    /// Build the agent with the three standard sources.
    ///
    /// The API key and store URL are resolved here, so a misconfigured
    /// agent fails before serving any request.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Config`](crate::LibrarianError::Config) if
    /// the API key or store URL is missing or the configuration is invalid.
    pub fn from_config(config: &LibrarianConfig) -> Result<Self> {
        config.validate()?;

        let api_key = config.generative.resolve_api_key()?;
        let store_url = config.store.resolve_url()?;
        let normalizer = Normalizer::shared(config.vocabulary.build()?);
        let vocabulary_size = normalizer.vocabulary().len();

        let client = Arc::new(GenerativeClient::new(
            config.generative.base_url.clone(),
            api_key,
            Duration::from_secs(config.generative.request_timeout_secs),
        )?);

        let sources: Vec<Arc<dyn EvidenceSource>> = vec![
            Arc::new(KnowledgeSource::new(
                Arc::clone(&client),
                config.generative.knowledge_model.clone(),
                Arc::clone(&normalizer),
            )),
            Arc::new(SearchGroundedSource::new(
                Arc::clone(&client),
                config.generative.search_model.clone(),
                Arc::clone(&normalizer),
            )),
            Arc::new(StoreSource::new(
                store_url,
                Duration::from_secs(config.store.request_timeout_secs),
                normalizer,
            )?),
        ];

        tracing::info!(
            knowledge_model = %config.generative.knowledge_model,
            search_model = %config.generative.search_model,
            vocabulary_size,
            "trope agent ready"
        );
        Ok(Self::with_sources(sources, config.fusion.clone()))
    }

    /// Build the agent from explicit sources.
    pub fn with_sources(sources: Vec<Arc<dyn EvidenceSource>>, fusion: FusionConfig) -> Self {
        Self { sources, fusion }
    }

    /// Identify the top `top_n` tropes for a book.
    ///
    /// # Errors
    ///
    /// Returns [`trope_fusion::FusionError`] on an unexpected fault. Source
    /// failures are not errors.
    pub async fn identify(
        &self,
        title: &str,
        author: &str,
        top_n: i64,
    ) -> trope_fusion::Result<Vec<AggregatedTrope>> {
        trope_fusion::identify(&self.sources, title, author, top_n, &self.fusion).await
    }

    /// Like [`identify`](Self::identify), also returning per-source outcomes.
    ///
    /// # Errors
    ///
    /// Same as [`identify`](Self::identify).
    pub async fn identify_detailed(
        &self,
        title: &str,
        author: &str,
        top_n: i64,
    ) -> trope_fusion::Result<Identification> {
        trope_fusion::identify_detailed(&self.sources, title, author, top_n, &self.fusion).await
    }

    /// Answer one request.
    pub async fn process(&self, request: &Request) -> Response {
        let valid = match request.validate(self.fusion.default_top_n) {
            Ok(valid) => valid,
            Err(response) => {
                tracing::warn!("rejecting request without title or author");
                return response;
            }
        };

        match self.identify(&valid.title, &valid.author, valid.top_n).await {
            Ok(tropes) => {
                tracing::info!(count = tropes.len(), "request answered");
                Response::success(tropes)
            }
            Err(e) => {
                tracing::error!(error = %e, "trope identification failed");
                Response::processing_error(e)
            }
        }
    }

    /// Answer one newline-delimited JSON request line.
    pub async fn process_line(&self, line: &str) -> Response {
        match Request::from_json_line(line) {
            Ok(request) => self.process(&request).await,
            Err(description) => {
                tracing::warn!(error = %description, "unparseable request line");
                Response::processing_error(description)
            }
        }
    }
}
