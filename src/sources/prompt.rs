//! Prompt builders for the generative sources.

use trope_fusion::CanonicalVocabulary;

fn bullet_list(vocabulary: &CanonicalVocabulary) -> String {
    vocabulary
        .entries()
        .iter()
        .map(|entry| format!("- {entry}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking a model for tropes from its trained knowledge.
pub fn knowledge_prompt(title: &str, author: &str, vocabulary: &CanonicalVocabulary) -> String {
    format!(
        r#"Analyze the book "{title}" by {author} and identify the major literary tropes it uses.
A trope is a common or recurring literary device, theme, motif, or cliché.

Return ONLY a raw JSON object with this structure:
{{
  "tropes": [
    {{"name": "trope name", "confidence": 0.0-1.0, "description": "brief description"}}
  ]
}}

Prefer these well-known trope names, spelled exactly as listed:
{list}"#,
        list = bullet_list(vocabulary),
    )
}

/// Prompt asking a search-grounded model for tropes found in online discussion.
pub fn search_prompt(title: &str, author: &str, vocabulary: &CanonicalVocabulary) -> String {
    format!(
        r#"Search the web for information about "{title}" by {author}.
From reviews, analyses, and reader discussions, identify the major literary tropes the book uses.

Return ONLY a raw JSON object:
{{
  "tropes": [
    {{"name": "trope name", "confidence": 0.0-1.0}}
  ]
}}

Use these canonical trope names when they apply:
{list}"#,
        list = bullet_list(vocabulary),
    )
}
