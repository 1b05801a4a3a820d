//! Token usage reported by the generation service.

use serde::{Deserialize, Serialize};

/// Token counts for one or more generation calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub total_tokens: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    /// Number of successful requests counted.
    pub successful_requests: i64,
}

impl UsageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usage of a single successful request.
    pub fn from_counts(prompt_tokens: i64, completion_tokens: i64) -> Self {
        Self {
            total_tokens: prompt_tokens + completion_tokens,
            prompt_tokens,
            completion_tokens,
            successful_requests: 1,
        }
    }

    pub fn add_usage_metrics(&mut self, other: &UsageMetrics) {
        self.total_tokens += other.total_tokens;
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.successful_requests += other.successful_requests;
    }
}
