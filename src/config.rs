//! Configuration types for the trope agent.
//!
//! Loaded from TOML. Every section is optional and falls back to defaults,
//! so an empty file (or no file at all) yields a working configuration as
//! long as the API key and store URL are present in the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LibrarianError, Result};
use trope_fusion::{CanonicalVocabulary, FusionConfig};

/// Top-level configuration for the trope agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarianConfig {
    /// Generative-language API settings (knowledge and search sources).
    pub generative: GenerativeConfig,
    /// Trope store settings.
    pub store: StoreConfig,
    /// Per-source time budgets and result count.
    pub fusion: FusionConfig,
    /// Canonical vocabulary override.
    pub vocabulary: VocabularyConfig,
}

/// Generative-language API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    /// API root, without the `/v1beta/...` path.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Model used by the knowledge source.
    pub knowledge_model: String,
    /// Model used by the search-grounded source.
    pub search_model: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_owned(),
            api_key_env: "GOOGLE_SEARCH_API_KEY".to_owned(),
            knowledge_model: "gemini-2.5-flash-lite".to_owned(),
            search_model: "gemini-2.0-flash-exp".to_owned(),
            request_timeout_secs: 30,
        }
    }
}

impl GenerativeConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Config`] if the variable is unset or blank.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_from(|name| std::env::var(name).ok())
    }

    /// Like [`resolve_api_key`](Self::resolve_api_key), with an explicit
    /// variable lookup.
    pub fn resolve_api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_owned()),
            Some(_) => Err(LibrarianError::Config(format!(
                "{} environment variable is empty",
                self.api_key_env
            ))),
            None => Err(LibrarianError::Config(format!(
                "{} environment variable not set",
                self.api_key_env
            ))),
        }
    }
}

/// Trope store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store base URL. When unset, read from `url_env`.
    pub url: Option<String>,
    /// Environment variable consulted when `url` is unset.
    pub url_env: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: "MCP_SERVER_URL".to_owned(),
            request_timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// Resolve the store base URL, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Config`] if neither `url` nor the
    /// environment variable provides a non-blank value.
    pub fn resolve_url(&self) -> Result<String> {
        self.resolve_url_from(|name| std::env::var(name).ok())
    }

    /// Like [`resolve_url`](Self::resolve_url), with an explicit variable
    /// lookup.
    pub fn resolve_url_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let url = self
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| lookup(&self.url_env).filter(|u| !u.trim().is_empty()))
            .ok_or_else(|| {
                LibrarianError::Config(format!("{} environment variable not set", self.url_env))
            })?;
        Ok(url.trim().trim_end_matches('/').to_owned())
    }
}

/// Canonical vocabulary override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Replacement vocabulary, in priority order. `None` keeps the built-in list.
    pub entries: Option<Vec<String>>,
}

impl VocabularyConfig {
    /// Build the vocabulary this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Fusion`] if the override is empty or has a
    /// blank entry.
    pub fn build(&self) -> Result<CanonicalVocabulary> {
        match &self.entries {
            Some(entries) => Ok(CanonicalVocabulary::from_entries(entries.iter().cloned())?),
            None => Ok(CanonicalVocabulary::default()),
        }
    }
}

impl LibrarianConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            LibrarianError::Config(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Load from `path` if given, else from the default path if a file
    /// exists there, else use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` is missing or any file read
    /// fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading default config");
            return Self::from_file(&default_path);
        }
        Ok(Self::default())
    }

    /// Returns the default config file path: `~/.config/librarian/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("librarian").join("config.toml")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".config").join("librarian").join("config.toml")
        } else {
            PathBuf::from("/tmp/librarian-config/config.toml")
        }
    }

    /// Check every section, failing on the first invalid field.
    ///
    /// # Errors
    ///
    /// Returns [`LibrarianError::Config`] for zero HTTP timeouts or blank
    /// model names, and [`LibrarianError::Fusion`] for invalid fusion or
    /// vocabulary settings.
    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.vocabulary.build()?;
        if self.generative.request_timeout_secs == 0 {
            return Err(LibrarianError::Config(
                "generative.request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.store.request_timeout_secs == 0 {
            return Err(LibrarianError::Config(
                "store.request_timeout_secs must be greater than 0".into(),
            ));
        }
        for (field, model) in [
            ("knowledge_model", &self.generative.knowledge_model),
            ("search_model", &self.generative.search_model),
        ] {
            if model.trim().is_empty() {
                return Err(LibrarianError::Config(format!(
                    "generative.{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}
