//! Client for the generative-language `generateContent` API.
//!
//! Sends a single-turn text prompt and returns the concatenated text of the
//! first candidate. Optionally enables the `google_search` grounding tool.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LibrarianError, Result};
use trope_fusion::SourceError;

/// Whether a call may consult live web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grounding {
    /// Model knowledge only.
    None,
    /// Enable the `google_search` tool.
    GoogleSearch,
}

// ── Wire types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

fn build_request_body(prompt: &str, grounding: Grounding) -> serde_json::Value {
    let tools = match grounding {
        Grounding::None => Vec::new(),
        Grounding::GoogleSearch => vec![Tool {
            google_search: GoogleSearch {},
        }],
    };
    let request = GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
        tools,
    };
    serde_json::to_value(&request).unwrap_or_default()
}

fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Extract an error message from an API error body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

// ── Client ────────────────────────────────────────────────────

/// Shared HTTP client for the knowledge and search-grounded sources.
pub struct GenerativeClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GenerativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GenerativeClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Config`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LibrarianError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Send `prompt` to `model` and return the reply text.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Timeout`] if the HTTP request times out
    /// - [`SourceError::Http`] on transport failure or a non-success status
    /// - [`SourceError::Parse`] if the body is not a `generateContent` reply
    /// - [`SourceError::Upstream`] if the reply carries no candidate text
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        grounding: Grounding,
    ) -> std::result::Result<String, SourceError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let body = build_request_body(prompt, grounding);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(format!("{model} request timed out"))
                } else {
                    SourceError::Http(format!("{model} request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Http(format!(
                "{model} HTTP {}: {}",
                status.as_u16(),
                extract_error_message(&body_text)
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("{model} reply body: {e}")))?;

        first_candidate_text(parsed)
            .ok_or_else(|| SourceError::Upstream(format!("{model} returned no candidate text")))
    }
}
