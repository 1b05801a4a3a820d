//! OpenAI Chat Completions provider.
//!
//! Sends the prompt as a single user message to `{base}/chat/completions`
//! and returns the first choice's message content. Any OpenAI-compatible
//! endpoint works via `base_url`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llms::base_llm::{block_on, send_json_with_retries, BaseLLMState, Generation, TextGenerator};
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::GenerationError;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiGenerator {
    #[serde(flatten)]
    pub state: BaseLLMState,
    /// Organization ID, sent as `OpenAI-Organization`.
    pub organization: Option<String>,
    pub max_tokens: Option<u32>,
}

impl OpenAiGenerator {
    /// Create a generator. `api_key` defaults to `OPENAI_API_KEY`.
    pub fn new(model: impl Into<String>, api_key: Option<String>, base_url: Option<String>) -> Self {
        let mut state = BaseLLMState::new(model, "openai");
        state.api_key = api_key.or_else(|| std::env::var("OPENAI_API_KEY").ok());
        state.base_url = base_url;
        Self {
            state,
            organization: std::env::var("OPENAI_ORGANIZATION").ok(),
            max_tokens: None,
        }
    }

    pub fn api_base_url(&self) -> String {
        self.state
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = serde_json::json!({
            "model": self.state.model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if let Some(temp) = self.state.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }

    /// Extract reply text and usage from a decoded Chat Completions body.
    pub fn parse_response(response: &Value) -> Result<Generation, GenerationError> {
        if let Some(error) = response.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown OpenAI API error");
            return Err(GenerationError::Decode(format!("OpenAI API error: {}", msg)));
        }

        let content = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|c| c.as_str())
            .unwrap_or("");

        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let mut generation = Generation::new(content);
        if let Some(usage) = response.get("usage") {
            let prompt = usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0);
            let completion = usage
                .get("completion_tokens")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            generation = generation.with_usage(UsageMetrics::from_counts(prompt, completion));
        }
        Ok(generation)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        "openai"
    }

    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        log::debug!(
            "OpenAiGenerator.generate: model={}, prompt_chars={}",
            self.state.model,
            prompt.chars().count()
        );
        block_on(self.agenerate(prompt))?
    }

    async fn agenerate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let api_key = self.state.require_api_key()?;
        let body = self.build_request_body(prompt);
        let endpoint = format!("{}/chat/completions", self.api_base_url());
        let client = self.state.http_client()?;

        let response = send_json_with_retries("OpenAI", self.state.max_retries, || {
            let mut request = client
                .post(&endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", api_key));
            if let Some(ref org) = self.organization {
                request = request.header("OpenAI-Organization", org);
            }
            request.json(&body)
        })
        .await?;

        Self::parse_response(&response)
    }
}
