//! Helpers for pulling a JSON object out of model output.
//!
//! Models asked for "JSON only" still tend to wrap the object in a Markdown
//! code fence. Anything beyond a single enclosing fence is left for the
//! caller to treat as plain text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::utilities::errors::MalformedStructuredResponse;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*[ \t]*\r?\n(.*?)\r?\n?```$").expect("valid code fence pattern")
});

/// Strip a single Markdown code fence enclosing the whole text.
///
/// Returns the trimmed input when no enclosing fence is present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Strictly decode `text` as a `T`.
///
/// The whole text (after fence stripping) must be one JSON document;
/// JSON embedded in surrounding prose is rejected.
pub fn decode_strict<T: DeserializeOwned>(text: &str) -> Result<T, MalformedStructuredResponse> {
    let candidate = strip_code_fence(text);
    if !candidate.starts_with('{') {
        return Err(MalformedStructuredResponse::new("response is not a JSON object"));
    }
    serde_json::from_str(candidate).map_err(|e| MalformedStructuredResponse::new(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        a: i32,
    }

    #[test]
    fn test_strip_code_fence_json_tag() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(text), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fence_bare() {
        let text = "  ```\n{\"a\": 2}\n```  ";
        assert_eq!(strip_code_fence(text), "{\"a\": 2}");
    }

    #[test]
    fn test_strip_code_fence_no_fence() {
        assert_eq!(strip_code_fence("  plain  "), "plain");
    }

    #[test]
    fn test_decode_strict_accepts_object() {
        let sample: Sample = decode_strict("{\"a\": 7}").unwrap();
        assert_eq!(sample.a, 7);
    }

    #[test]
    fn test_decode_strict_rejects_prose() {
        let result: Result<Sample, _> = decode_strict("Sure! {\"a\": 7}");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_strict_rejects_non_object() {
        let result: Result<Sample, _> = decode_strict("[1, 2]");
        assert!(result.is_err());
    }
}
