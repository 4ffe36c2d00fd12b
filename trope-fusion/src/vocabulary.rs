//! The canonical trope vocabulary.
//!
//! Normalization maps free-text labels onto this list. Entry order is
//! significant: when several entries match a label, the earliest wins.

use crate::error::FusionError;

/// Built-in vocabulary, in matching priority order.
pub const DEFAULT_TROPES: &[&str] = &[
    "Hero's Journey",
    "Chosen One",
    "Enemies to Lovers",
    "Dark Lord",
    "Prophecy",
    "Coming of Age",
    "Redemption Arc",
    "Found Family",
    "MacGuffin",
    "Love Triangle",
    "Magic System",
    "Mentor's Death",
    "Reluctant Hero",
    "Fish Out of Water",
    "Secret Identity",
    "Betrayal",
    "Revenge Quest",
    "Star-Crossed Lovers",
    "Underdog",
    "Training Montage",
    "Ancient Evil",
    "Lost Heir",
    "Hidden Kingdom",
    "Portal Fantasy",
    "Heist",
    "Tournament Arc",
    "Memory Loss",
    "Time Loop",
    "Parallel Worlds",
    "Dystopia",
    "Post-Apocalyptic",
    "Utopia Gone Wrong",
    "Forbidden Love",
    "Artificial Intelligence",
    "First Contact",
    "Space Opera",
    "Cosmic Horror",
    "Body Horror",
    "Gothic Horror",
    "Psychological Horror",
];

/// An ordered, immutable list of known trope names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalVocabulary {
    entries: Vec<String>,
}

impl Default for CanonicalVocabulary {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TROPES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl CanonicalVocabulary {
    /// Build a vocabulary from an explicit list, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::Config`] if the list is empty or contains a
    /// blank entry.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, FusionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(FusionError::Config(
                "vocabulary must contain at least one trope".into(),
            ));
        }
        if let Some(pos) = entries.iter().position(|e| e.trim().is_empty()) {
            return Err(FusionError::Config(format!(
                "vocabulary entry {pos} is blank"
            )));
        }
        Ok(Self { entries })
    }

    /// Entries in priority order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether `name` is an exact (case-sensitive) entry.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
