//! Trope list parsing for model and store replies.
//!
//! Both upstreams answer with an object carrying a `tropes` array of
//! `{name, confidence}` entries. Model replies may additionally be wrapped
//! in markdown fences or surrounded by prose.

use serde_json::Value;
use tracing::debug;

use trope_fusion::SourceError;

/// Confidence assigned to store entries that carry none.
pub const STORE_DEFAULT_CONFIDENCE: f64 = 0.7;

/// Parse a generative model reply into raw `(label, confidence)` pairs.
///
/// Entries without a string `name` or a numeric `confidence` are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the reply holds no JSON object, or if
/// `tropes` is present but not an array.
pub fn parse_model_reply(raw: &str) -> Result<Vec<(String, f64)>, SourceError> {
    let json_str = extract_json_block(raw);
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| SourceError::Parse(format!("model reply is not JSON: {e}")))?;
    parse_trope_list(&value, None)
}

/// Parse a store reply body into raw `(label, confidence)` pairs.
///
/// Entries without a `confidence` get [`STORE_DEFAULT_CONFIDENCE`].
///
/// # Errors
///
/// Same as [`parse_model_reply`], for an already-decoded body.
pub fn parse_store_reply(value: &Value) -> Result<Vec<(String, f64)>, SourceError> {
    parse_trope_list(value, Some(STORE_DEFAULT_CONFIDENCE))
}

fn parse_trope_list(
    value: &Value,
    default_confidence: Option<f64>,
) -> Result<Vec<(String, f64)>, SourceError> {
    let object = value
        .as_object()
        .ok_or_else(|| SourceError::Parse("expected a JSON object".into()))?;

    let entries = match object.get("tropes") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(SourceError::Parse("`tropes` is not an array".into())),
    };

    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            debug!("skipping trope entry without a name");
            continue;
        };
        let confidence = match entry.get("confidence") {
            Some(Value::Number(n)) => n.as_f64(),
            None | Some(Value::Null) => default_confidence,
            Some(_) => None,
        };
        let Some(confidence) = confidence else {
            debug!(name, "skipping trope entry without a usable confidence");
            continue;
        };
        pairs.push((name.to_owned(), confidence));
    }
    Ok(pairs)
}

/// Extract the JSON body from a potentially markdown-fenced response.
pub fn extract_json_block(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    if let Some(start) = trimmed.find('{')
        && let Some(end) = trimmed.rfind('}')
        && end > start
    {
        return &trimmed[start..=end];
    }

    trimmed
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn parse_plain_reply() {
        let raw = r#"{"tropes": [
            {"name": "Chosen One", "confidence": 0.9, "description": "destined hero"},
            {"name": "Prophecy", "confidence": 0.75}
        ]}"#;
        let pairs = parse_model_reply(raw).unwrap();
        assert_eq!(
            pairs,
            vec![("Chosen One".to_owned(), 0.9), ("Prophecy".to_owned(), 0.75)]
        );
    }

    #[test]
    fn parse_fenced_reply() {
        let raw = "```json\n{\"tropes\": [{\"name\": \"Heist\", \"confidence\": 0.8}]}\n```";
        assert_eq!(parse_model_reply(raw).unwrap(), vec![("Heist".to_owned(), 0.8)]);
    }

    #[test]
    fn parse_reply_with_surrounding_prose() {
        let raw = "Here you go: {\"tropes\": [{\"name\": \"Heist\", \"confidence\": 1}]} Enjoy!";
        assert_eq!(parse_model_reply(raw).unwrap(), vec![("Heist".to_owned(), 1.0)]);
    }

    #[test]
    fn non_json_reply_is_parse_error() {
        let err = parse_model_reply("I could not find that book.").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn non_object_reply_is_parse_error() {
        let err = parse_store_reply(&json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn tropes_of_wrong_type_is_parse_error() {
        let err = parse_model_reply(r#"{"tropes": "Heist"}"#).unwrap_err();
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn missing_tropes_key_is_empty() {
        assert!(parse_model_reply(r#"{"books": []}"#).unwrap().is_empty());
        assert!(parse_store_reply(&json!({"tropes": null})).unwrap().is_empty());
    }

    #[test]
    fn model_entries_need_name_and_numeric_confidence() {
        let raw = r#"{"tropes": [
            {"confidence": 0.9},
            {"name": 42, "confidence": 0.9},
            {"name": "Betrayal"},
            {"name": "Underdog", "confidence": "high"},
            {"name": "Dystopia", "confidence": 0.4}
        ]}"#;
        assert_eq!(parse_model_reply(raw).unwrap(), vec![("Dystopia".to_owned(), 0.4)]);
    }

    #[test]
    fn store_entries_default_missing_confidence() {
        let body = json!({"tropes": [
            {"name": "Found Family"},
            {"name": "Heist", "confidence": 0.95},
            {"name": "Betrayal", "confidence": "n/a"}
        ]});
        assert_eq!(
            parse_store_reply(&body).unwrap(),
            vec![("Found Family".to_owned(), 0.7), ("Heist".to_owned(), 0.95)]
        );
    }

    #[test]
    fn extract_json_block_plain() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(extract_json_block(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn extract_json_block_bare_fence() {
        let input = "```\n{\"key\": 1}\n```";
        assert_eq!(extract_json_block(input), r#"{"key": 1}"#);
    }
}
