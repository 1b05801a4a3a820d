//! Google Gemini text generation provider.
//!
//! Talks to the Gemini `generateContent` REST endpoint. The prompt is sent as
//! a single user turn; the reply text is the concatenation of the first
//! candidate's text parts.
//!
//! # Authentication
//!
//! Uses an explicit key, falling back to `GOOGLE_API_KEY` or
//! `GEMINI_API_KEY`. The key travels as the `key` query parameter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llms::base_llm::{block_on, send_json_with_retries, BaseLLMState, Generation, TextGenerator};
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::GenerationError;

/// Default public endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini generator.
///
/// ```ignore
/// let generator = GeminiGenerator::new("gemini-1.5-flash", None);
/// let generation = generator.generate("Say hi")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiGenerator {
    #[serde(flatten)]
    pub state: BaseLLMState,
    /// Upper bound on reply length, in tokens.
    pub max_output_tokens: Option<u32>,
}

impl GeminiGenerator {
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        let mut state = BaseLLMState::new(model, "gemini");
        state.api_key = api_key
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        Self {
            state,
            max_output_tokens: None,
        }
    }

    fn api_endpoint(&self) -> String {
        let base = self
            .state
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.state.model)
    }

    fn generation_config(&self) -> Value {
        let mut config = serde_json::Map::new();
        if let Some(temp) = self.state.temperature {
            config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = self.max_output_tokens {
            config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        Value::Object(config)
    }

    pub fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": self.generation_config(),
        })
    }

    /// Extract reply text and usage from a decoded response body.
    pub fn parse_response(response: &Value) -> Result<Generation, GenerationError> {
        if let Some(error) = response.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown Gemini API error");
            return Err(GenerationError::Decode(format!("Gemini API error: {}", msg)));
        }

        let text = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let mut generation = Generation::new(text);
        if let Some(usage) = Self::extract_token_usage(response) {
            generation = generation.with_usage(usage);
        }
        Ok(generation)
    }

    fn extract_token_usage(response: &Value) -> Option<UsageMetrics> {
        let usage = response.get("usageMetadata")?;
        let prompt = usage
            .get("promptTokenCount")
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        let completion = usage
            .get("candidatesTokenCount")
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Some(UsageMetrics::from_counts(prompt, completion))
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        "gemini"
    }

    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        log::debug!(
            "GeminiGenerator.generate: model={}, prompt_chars={}",
            self.state.model,
            prompt.chars().count()
        );
        block_on(self.agenerate(prompt))?
    }

    async fn agenerate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let api_key = self.state.require_api_key()?;
        let body = self.build_request_body(prompt);
        let endpoint = self.api_endpoint();
        let client = self.state.http_client()?;

        let response = send_json_with_retries("Gemini", self.state.max_retries, || {
            client
                .post(&endpoint)
                .header("content-type", "application/json")
                .query(&[("key", api_key)])
                .json(&body)
        })
        .await?;

        Self::parse_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> GeminiGenerator {
        GeminiGenerator::new("gemini-1.5-flash", Some("test-key".into()))
    }

    #[test]
    fn test_endpoint() {
        let mut g = generator();
        assert_eq!(
            g.api_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        g.state.base_url = Some("http://localhost:8080/".into());
        assert_eq!(
            g.api_endpoint(),
            "http://localhost:8080/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body() {
        let mut g = generator();
        g.state.temperature = Some(0.7);
        let body = g.build_request_body("Hello there");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello there");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let response = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Take a " }, { "text": "walk." }] }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 4 }
        });
        let generation = GeminiGenerator::parse_response(&response).unwrap();
        assert_eq!(generation.text, "Take a walk.");
        assert_eq!(generation.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn test_parse_response_without_text_is_empty() {
        let response = serde_json::json!({ "candidates": [] });
        assert!(matches!(
            GeminiGenerator::parse_response(&response),
            Err(GenerationError::EmptyResponse)
        ));
        let blank = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        });
        assert!(matches!(
            GeminiGenerator::parse_response(&blank),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_response_error_object() {
        let response = serde_json::json!({ "error": { "message": "quota exceeded" } });
        let err = GeminiGenerator::parse_response(&response).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", generator());
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_generate_with_huge_timeout_fails_without_panic() {
        let mut g = generator();
        g.state.timeout = 1e20;
        assert!(matches!(g.generate("hi"), Err(GenerationError::Transport(_))));
    }

    #[test]
    fn test_generate_without_key_fails_fast() {
        let mut g = generator();
        g.state.api_key = None;
        assert!(matches!(
            g.generate("hi"),
            Err(GenerationError::MissingApiKey { .. })
        ));
    }
}
