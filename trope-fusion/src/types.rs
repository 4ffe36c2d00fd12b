//! Core types for trope evidence and source identification.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// The evidence sources that trope identification draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// A language model's trained knowledge, no live lookup.
    Knowledge,
    /// Live web evidence fused with model reasoning.
    Search,
    /// Previously curated evidence from a queryable store.
    Store,
}

impl SourceTag {
    /// Returns the wire name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Search => "search",
            Self::Store => "store",
        }
    }

    /// Returns the fixed weight applied to this source's confidences
    /// during aggregation.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Knowledge => 1.0,
            Self::Search => 0.8,
            Self::Store => 1.2,
        }
    }

    /// Returns all sources in fold order.
    pub fn all() -> &'static [SourceTag] {
        &[Self::Knowledge, Self::Search, Self::Store]
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One source's confidence claim that a label applies to a book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Which source produced this claim.
    pub source: SourceTag,
}

impl Evidence {
    /// Build evidence, clamping `confidence` into `[0, 1]`.
    ///
    /// Returns `None` for NaN or infinite confidences.
    pub fn new(confidence: f64, source: SourceTag) -> Option<Self> {
        if !confidence.is_finite() {
            return None;
        }
        Some(Self {
            confidence: confidence.clamp(0.0, 1.0),
            source,
        })
    }
}

/// Label-keyed evidence from one source call.
///
/// Keeps labels in first-insertion order. Inserting a label that is
/// already present replaces its evidence but not its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceResult {
    entries: Vec<(String, Evidence)>,
    /// Label to position in `entries`.
    index: HashMap<String, usize>,
}

impl SourceResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert evidence for `label`; the last insert for a label wins.
    pub fn insert(&mut self, label: impl Into<String>, evidence: Evidence) {
        let label = label.into();
        match self.index.get(&label).and_then(|&pos| self.entries.get_mut(pos)) {
            Some((_, slot)) => *slot = evidence,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, evidence));
            }
        }
    }

    /// Look up the evidence recorded for `label`.
    pub fn get(&self, label: &str) -> Option<&Evidence> {
        self.index
            .get(label)
            .and_then(|&pos| self.entries.get(pos))
            .map(|(_, evidence)| evidence)
    }

    /// Iterate labels and evidence in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Evidence)> {
        self.entries.iter().map(|(label, ev)| (label.as_str(), ev))
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SourceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, evidence) in &self.entries {
            map.serialize_entry(label, evidence)?;
        }
        map.end()
    }
}

/// A trope after fusion across all sources.
///
/// Equality compares the wire fields only, so a trope equals its own
/// serialize/deserialize round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedTrope {
    /// Canonical (or passed-through) trope name.
    pub name: String,
    /// Fused confidence in `[0, 1]`.
    pub confidence: f64,
    /// Contributing sources, in fold order. Never empty.
    pub sources: Vec<SourceTag>,
    /// Position of first discovery across the fold; used as ranking
    /// tie-break. Not part of the wire format.
    #[serde(skip)]
    pub first_seen_order: usize,
}

impl PartialEq for AggregatedTrope {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.confidence == other.confidence
            && self.sources == other.sources
    }
}
