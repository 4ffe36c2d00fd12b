//! Evidence from the curated trope store.
//!
//! The store answers `POST {base}/query` with
//! `{"title", "author", "query_type": "tropes"}` and replies with a
//! `tropes` array. Entries without a confidence count as 0.7.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use trope_fusion::{EvidenceSource, Normalizer, SourceError, SourceResult, SourceTag};

use crate::error::{LibrarianError, Result};
use crate::extraction::parse_store_reply;

#[derive(Debug, Serialize)]
struct StoreQuery<'a> {
    title: &'a str,
    author: &'a str,
    query_type: &'static str,
}

/// Queries the trope store for previously curated evidence.
#[derive(Debug)]
pub struct StoreSource {
    base_url: String,
    client: reqwest::Client,
    normalizer: Arc<Normalizer>,
}

impl StoreSource {
    /// Create a store source for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Config`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        normalizer: Arc<Normalizer>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LibrarianError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
            normalizer,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }
}

#[async_trait]
impl EvidenceSource for StoreSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Store
    }

    async fn fetch(
        &self,
        title: &str,
        author: &str,
    ) -> std::result::Result<SourceResult, SourceError> {
        let query = StoreQuery {
            title,
            author,
            query_type: "tropes",
        };

        let response = self
            .client
            .post(self.query_url())
            .json(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout("store request timed out".into())
                } else {
                    SourceError::Http(format!("store request failed: {e}"))
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SourceError::Http(format!(
                "store returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("store reply body: {e}")))?;
        let pairs = parse_store_reply(&body)?;
        Ok(self.normalizer.collect(self.tag(), pairs))
    }
}
