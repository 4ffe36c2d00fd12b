//! Label normalization against the canonical vocabulary.
//!
//! Matching rules, first hit wins:
//!
//! 1. Case-insensitive exact match on the trimmed label.
//! 2. Containment either way between the lower-cased trimmed label and an
//!    entry, provided the label is at least 60% as long as the entry.
//!    Entries are tried in vocabulary order.
//! 3. No match: the label is returned unchanged.

use std::sync::Arc;

use crate::types::{Evidence, SourceResult, SourceTag};
use crate::vocabulary::CanonicalVocabulary;

/// Minimum label length, as a fraction of the entry length, for a
/// containment match to count.
const MIN_LENGTH_RATIO: f64 = 0.6;

/// Maps raw trope labels onto a [`CanonicalVocabulary`].
///
/// Cheap to share: clone the `Arc` returned by [`Normalizer::shared`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    vocabulary: CanonicalVocabulary,
    lowered: Vec<String>,
}

impl Normalizer {
    pub fn new(vocabulary: CanonicalVocabulary) -> Self {
        let lowered = vocabulary
            .entries()
            .iter()
            .map(|entry| entry.to_lowercase())
            .collect();
        Self {
            vocabulary,
            lowered,
        }
    }

    /// Build a normalizer wrapped for sharing across sources.
    pub fn shared(vocabulary: CanonicalVocabulary) -> Arc<Self> {
        Arc::new(Self::new(vocabulary))
    }

    pub fn vocabulary(&self) -> &CanonicalVocabulary {
        &self.vocabulary
    }

    /// Normalize a raw label. Never fails; unknown labels pass through.
    pub fn normalize(&self, raw: &str) -> String {
        let label = raw.trim().to_lowercase();
        if label.is_empty() {
            return raw.to_owned();
        }

        let entries = self.vocabulary.entries();

        if let Some(idx) = self.lowered.iter().position(|entry| *entry == label) {
            return entries[idx].clone();
        }

        let label_len = label.chars().count() as f64;
        for (idx, entry) in self.lowered.iter().enumerate() {
            let contained = entry.contains(label.as_str()) || label.contains(entry.as_str());
            if contained && label_len >= entry.chars().count() as f64 * MIN_LENGTH_RATIO {
                return entries[idx].clone();
            }
        }

        raw.to_owned()
    }

    /// Normalize a batch of raw `(label, confidence)` pairs from one source
    /// call into a [`SourceResult`].
    ///
    /// Labels that normalize to the same name collapse, last one winning.
    /// Pairs with a non-finite confidence are dropped.
    pub fn collect<I, S>(&self, source: SourceTag, raw: I) -> SourceResult
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut result = SourceResult::new();
        for (label, confidence) in raw {
            let Some(evidence) = Evidence::new(confidence, source) else {
                tracing::debug!(%source, label = label.as_ref(), "dropping non-finite confidence");
                continue;
            };
            result.insert(self.normalize(label.as_ref()), evidence);
        }
        result
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(CanonicalVocabulary::default())
    }
}
