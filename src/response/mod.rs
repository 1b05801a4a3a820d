//! Generation results and response normalization.
//!
//! Raw service text is normalized into a [`GenerationResult`]. Structured
//! replies are decoded in two stages: a strict decode of the fixed-key
//! object, then a fallback that keeps the raw text as
//! [`GenerationResult::PlainText`]. A malformed structured reply is never an
//! error for the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utilities::converter::decode_strict;
use crate::utilities::errors::{GenerationError, MalformedStructuredResponse};
use crate::utilities::string_utils::non_blank;

/// JSON key for the suggestion field.
pub const SUGGESTION_KEY: &str = "suggestion";
/// JSON key for the motivational message field.
pub const MOTIVATIONAL_MESSAGE_KEY: &str = "motivational_message";
/// JSON key for the optional joke field.
pub const JOKE_KEY: &str = "joke";

/// User-facing message shown whenever generation fails.
pub const FAILURE_SENTINEL: &str =
    "I'm having trouble finding the right words right now. Please try again in a moment.";

/// The fixed three-field advice object requested in JSON mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAdvice {
    pub suggestion: String,
    pub motivational_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joke: Option<String>,
}

impl StructuredAdvice {
    /// Render as a Markdown document with one section per field.
    pub fn to_document(&self) -> String {
        let mut doc = format!(
            "## Your Suggestion\n\n{}\n\n## Motivational Message\n\n{}\n",
            self.suggestion, self.motivational_message
        );
        if let Some(joke) = &self.joke {
            doc.push_str(&format!("\n## A Little Joke\n\n{}\n", joke));
        }
        doc
    }
}

/// Why a generation produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The outbound call failed or raised.
    Transport(String),
    /// The service returned no text.
    EmptyResponse,
}

impl From<&GenerationError> for FailureReason {
    fn from(err: &GenerationError) -> Self {
        match err {
            GenerationError::EmptyResponse => FailureReason::EmptyResponse,
            other => FailureReason::Transport(other.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport(detail) => write!(f, "transport failure: {}", detail),
            FailureReason::EmptyResponse => write!(f, "empty response"),
        }
    }
}

/// Outcome of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationResult {
    PlainText { text: String },
    StructuredAdvice(StructuredAdvice),
    Failure { reason: FailureReason },
}

impl GenerationResult {
    pub fn plain(text: impl Into<String>) -> Self {
        GenerationResult::PlainText { text: text.into() }
    }

    pub fn failure(reason: FailureReason) -> Self {
        GenerationResult::Failure { reason }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, GenerationResult::Failure { .. })
    }

    /// The text a caller shows to the user for this result.
    ///
    /// Failures render as [`FAILURE_SENTINEL`], never as a technical error.
    pub fn display_text(&self) -> String {
        match self {
            GenerationResult::PlainText { text } => text.clone(),
            GenerationResult::StructuredAdvice(advice) => advice.to_document(),
            GenerationResult::Failure { .. } => FAILURE_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAdvice {
    suggestion: String,
    motivational_message: String,
    #[serde(default)]
    joke: Option<String>,
}

/// Strict stage: decode the fixed-key advice object.
///
/// `joke` may be missing, null or blank, all of which become `None`.
pub fn parse_structured_advice(text: &str) -> Result<StructuredAdvice, MalformedStructuredResponse> {
    let raw: RawAdvice = decode_strict(text)?;
    Ok(StructuredAdvice {
        suggestion: raw.suggestion,
        motivational_message: raw.motivational_message,
        joke: raw.joke.filter(|joke| non_blank(joke).is_some()),
    })
}

/// Normalize returned service text.
///
/// Empty or whitespace-only text maps to [`GenerationError::EmptyResponse`].
pub fn normalize_text(text: &str) -> Result<String, GenerationError> {
    non_blank(text)
        .map(str::to_string)
        .ok_or(GenerationError::EmptyResponse)
}

/// Two-stage parse: structured advice when `structured` is requested and
/// decodes, otherwise plain text holding `text` unchanged.
pub fn interpret(text: &str, structured: bool) -> GenerationResult {
    if !structured {
        return GenerationResult::plain(text);
    }
    match parse_structured_advice(text) {
        Ok(advice) => GenerationResult::StructuredAdvice(advice),
        Err(err) => {
            tracing::debug!(error = %err, "structured decode failed, degrading to plain text");
            GenerationResult::plain(text)
        }
    }
}
