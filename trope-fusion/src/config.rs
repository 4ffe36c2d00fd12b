//! Fusion configuration with sensible defaults.
//!
//! [`FusionConfig`] controls the per-source time budgets and the default
//! result count. The store source gets the tightest budget because it is
//! expected to answer from an index rather than run a model.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FusionError;
use crate::types::SourceTag;

/// Default number of tropes returned when a request does not say.
pub const DEFAULT_TOP_N: i64 = 5;

/// Configuration for a fusion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Time budget for the knowledge source, in seconds.
    pub knowledge_timeout_secs: u64,
    /// Time budget for the search-grounded source, in seconds.
    pub search_timeout_secs: u64,
    /// Time budget for the store source, in seconds.
    pub store_timeout_secs: u64,
    /// Result count used when a request omits `top_n`.
    pub default_top_n: i64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            knowledge_timeout_secs: 30,
            search_timeout_secs: 30,
            store_timeout_secs: 10,
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl FusionConfig {
    /// Time budget for the given source.
    pub fn timeout_for(&self, tag: SourceTag) -> Duration {
        let secs = match tag {
            SourceTag::Knowledge => self.knowledge_timeout_secs,
            SourceTag::Search => self.search_timeout_secs,
            SourceTag::Store => self.store_timeout_secs,
        };
        Duration::from_secs(secs)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - every per-source timeout must be greater than 0
    /// - `default_top_n` must be greater than 0
    pub fn validate(&self) -> Result<(), FusionError> {
        for tag in SourceTag::all() {
            if self.timeout_for(*tag).is_zero() {
                return Err(FusionError::Config(format!(
                    "{tag}_timeout_secs must be greater than 0"
                )));
            }
        }
        if self.default_top_n <= 0 {
            return Err(FusionError::Config(
                "default_top_n must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
