//! Outbound text generation.
//!
//! - [`base_llm`] - The [`TextGenerator`] trait and shared HTTP plumbing
//! - [`providers`] - Gemini and OpenAI implementations

pub mod base_llm;
pub mod providers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;

pub use base_llm::{BaseLLMState, Generation, TextGenerator};
pub use providers::gemini::GeminiGenerator;
pub use providers::openai::OpenAiGenerator;

/// Supported generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => providers::gemini::DEFAULT_MODEL,
            ProviderKind::OpenAi => providers::openai::DEFAULT_MODEL,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Build the generator selected by `config`.
pub fn build_generator(config: &GenerationConfig) -> Box<dyn TextGenerator> {
    match config.provider {
        ProviderKind::Gemini => {
            let mut generator = GeminiGenerator::new(config.model.clone(), config.api_key.clone());
            apply_common(&mut generator.state, config);
            Box::new(generator)
        }
        ProviderKind::OpenAi => {
            let mut generator = OpenAiGenerator::new(
                config.model.clone(),
                config.api_key.clone(),
                config.base_url.clone(),
            );
            apply_common(&mut generator.state, config);
            Box::new(generator)
        }
    }
}

fn apply_common(state: &mut BaseLLMState, config: &GenerationConfig) {
    state.temperature = config.temperature;
    state.timeout = config.timeout_secs;
    state.max_retries = config.max_retries;
    if config.base_url.is_some() {
        state.base_url = config.base_url.clone();
    }
}
