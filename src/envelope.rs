//! Request and response shapes for trope identification.
//!
//! A request is `{"title", "author", "top_n"?}`. A response is tagged by
//! `status`: `{"status": "success", "tropes": [...]}` or
//! `{"status": "error", "message": "..."}`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use trope_fusion::AggregatedTrope;

/// Message returned when either required field is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Both 'title' and 'author' are required fields";

/// Prefix of every message produced by an unexpected fault.
pub const PROCESSING_ERROR_PREFIX: &str = "Error processing request: ";

/// An identification request.
///
/// A `title` or `author` of the wrong JSON type deserializes as absent.
/// A `top_n` that is present but not an integer is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "strict_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub top_n: Option<i64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub title: String,
    pub author: String,
    pub top_n: i64,
}

impl Request {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            top_n: None,
        }
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: i64) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// Parse one line of JSON into a request.
    ///
    /// # Errors
    ///
    /// Returns a description if the line is not valid JSON, not an object,
    /// or carries a non-integer `top_n`.
    pub fn from_json_line(line: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| format!("invalid JSON: {e}"))?;
        if !value.is_object() {
            return Err("request must be a JSON object".to_owned());
        }
        serde_json::from_value(value).map_err(|e| format!("invalid request: {e}"))
    }

    /// Check required fields and fill in `top_n`.
    ///
    /// Title and author are trimmed; blank counts as missing.
    ///
    /// # Errors
    ///
    /// Returns the error [`Response`] to send back if either field is missing.
    pub fn validate(&self, default_top_n: i64) -> Result<ValidRequest, Response> {
        let present = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        match (present(&self.title), present(&self.author)) {
            (Some(title), Some(author)) => Ok(ValidRequest {
                title,
                author,
                top_n: self.top_n.unwrap_or(default_top_n),
            }),
            _ => Err(Response::error(MISSING_FIELDS_MESSAGE)),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_owned)))
}

fn strict_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let Some(value) = Option::<Value>::deserialize(d)? else {
        return Ok(None);
    };
    value
        .as_i64()
        // Integers beyond i64 still mean "all of them".
        .or_else(|| value.as_u64().map(|_| i64::MAX))
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("top_n must be an integer, got {value}")))
}

/// An identification response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success { tropes: Vec<AggregatedTrope> },
    Error { message: String },
}

impl Response {
    pub fn success(tropes: Vec<AggregatedTrope>) -> Self {
        Self::Success { tropes }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Error response for an unexpected fault.
    pub fn processing_error(description: impl std::fmt::Display) -> Self {
        Self::error(format!("{PROCESSING_ERROR_PREFIX}{description}"))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
