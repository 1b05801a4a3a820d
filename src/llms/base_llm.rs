//! Base trait for text generation backends.
//!
//! The engine depends on exactly one outbound operation,
//! `generate(prompt) -> text`. Authentication, timeouts and any retry policy
//! belong to the implementation, never to the caller.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::GenerationError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 60.0;

/// Text returned by one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub usage: Option<UsageMetrics>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: UsageMetrics) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// A backend able to turn a prompt into text.
///
/// `generate` blocks the caller until the call completes or fails.
/// Implementations should surface empty output as
/// [`GenerationError::EmptyResponse`].
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    /// Model identifier.
    fn model(&self) -> &str;

    /// Provider name (e.g. "gemini").
    fn provider(&self) -> &str;

    /// Generate text for `prompt`, blocking until done.
    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;

    /// Async variant. Not every backend supports it.
    async fn agenerate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let _ = prompt;
        Err(GenerationError::Unsupported(format!(
            "async generation not implemented for provider '{}'",
            self.provider()
        )))
    }
}

/// Shared configuration embedded by HTTP providers.
#[derive(Clone, Serialize, Deserialize)]
pub struct BaseLLMState {
    pub model: String,
    pub provider: String,
    pub temperature: Option<f64>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout: f64,
    /// Extra attempts after a retryable failure. Zero means exactly one request.
    pub max_retries: u32,
}

impl BaseLLMState {
    pub fn new(model: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            provider: provider.into(),
            temperature: None,
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }

    pub fn require_api_key(&self) -> Result<&str, GenerationError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey {
                provider: self.provider.clone(),
            })
    }

    pub fn http_client(&self) -> Result<reqwest::Client, GenerationError> {
        let timeout = Duration::try_from_secs_f64(self.timeout).map_err(|e| {
            GenerationError::Transport(format!("invalid timeout {}: {}", self.timeout, e))
        })?;
        Ok(reqwest::Client::builder().timeout(timeout).build()?)
    }
}

impl fmt::Debug for BaseLLMState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLLMState")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Send a request built by `build`, retrying transport failures, 429s and
/// 5xx responses up to `max_retries` times with exponential backoff.
///
/// Returns the decoded JSON body of the first successful response.
pub async fn send_json_with_retries<F>(
    provider: &str,
    max_retries: u32,
    build: F,
) -> Result<Value, GenerationError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<GenerationError> = None;
    let mut retry_delay = Duration::from_secs(1);

    for attempt in 0..=max_retries {
        if attempt > 0 {
            log::warn!(
                "{} API retry attempt {} after {:?}",
                provider,
                attempt,
                retry_delay
            );
            tokio::time::sleep(retry_delay).await;
            retry_delay *= 2;
        }

        let response = match build().send().await {
            Ok(resp) => resp,
            Err(e) => {
                last_error = Some(e.into());
                continue;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                last_error = Some(e.into());
                continue;
            }
        };

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            last_error = Some(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
            continue;
        }

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        return serde_json::from_str(&body).map_err(|e| {
            GenerationError::Decode(format!(
                "{} - Body: {}",
                e,
                body.chars().take(500).collect::<String>()
            ))
        });
    }

    Err(last_error.unwrap_or_else(|| {
        GenerationError::Transport(format!("{} API call failed after all retries", provider))
    }))
}

/// Drive `future` to completion on a private current-thread runtime.
///
/// Must not be called from inside an async runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, GenerationError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults_to_single_attempt() {
        let state = BaseLLMState::new("gemini-1.5-flash", "gemini");
        assert_eq!(state.max_retries, 0);
        assert_eq!(state.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_require_api_key() {
        let mut state = BaseLLMState::new("m", "openai");
        assert!(matches!(
            state.require_api_key(),
            Err(GenerationError::MissingApiKey { .. })
        ));
        state.api_key = Some(String::new());
        assert!(state.require_api_key().is_err());
        state.api_key = Some("sk-test".into());
        assert_eq!(state.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut state = BaseLLMState::new("m", "openai");
        state.api_key = Some("secret".into());
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut state = BaseLLMState::new("m", "gemini");
        state.api_key = Some("super-secret-key".into());
        let debug = format!("{:?}", state);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_out_of_range_timeout_is_transport_error() {
        let mut state = BaseLLMState::new("m", "gemini");
        state.timeout = 1e20;
        assert!(matches!(state.http_client(), Err(GenerationError::Transport(_))));
        state.timeout = -1.0;
        assert!(state.http_client().is_err());
    }

    #[test]
    fn test_block_on_runs_future() {
        let value = block_on(async { 41 + 1 }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_generation_with_usage() {
        let generation = Generation::new("hi").with_usage(UsageMetrics::from_counts(1, 2));
        assert_eq!(generation.usage.unwrap().total_tokens, 3);
    }
}
