//! Generator abstraction and request/response types.
//!
//! This module defines the boundary between the answering pipeline and the
//! generative model that writes the answer.

use medrag_core::AppResult;
use serde::{Deserialize, Serialize};

/// Text generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The prompt text sent to the model
    pub prompt: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for sampling; 0.0 selects greedy decoding
    pub temperature: f32,

    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl GenerationRequest {
    /// Create a greedy-decoding request with the given token budget.
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.0,
            system: None,
        }
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Generated completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: GenerationUsage,

    /// Whether generation stopped because the token budget ran out
    #[serde(default)]
    pub truncated: bool,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GenerationUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl GenerationUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for generative model backends.
///
/// Implementations fail with `AppError::GenerationUnavailable` when the model
/// cannot run. Running out of tokens is not a failure: the partial text is
/// returned with `truncated` set.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Get the backend name (e.g., "ollama", "extractive").
    fn provider_name(&self) -> &str;

    /// Get the model identifier.
    fn model_name(&self) -> &str;

    /// Run a completion request.
    async fn complete(&self, request: &GenerationRequest) -> AppResult<Generation>;

    /// Generate text for `prompt` with greedy decoding, bounded by `max_tokens`.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<String> {
        let request = GenerationRequest::new(prompt, max_tokens);
        Ok(self.complete(&request).await?.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_greedy() {
        let request = GenerationRequest::new("Hello", 42);
        assert_eq!(request.max_tokens, 42);
        assert_eq!(request.temperature, 0.0);
        assert!(request.system.is_none());
    }

    #[test]
    fn test_request_builders() {
        let request = GenerationRequest::new("Hello", 10)
            .with_temperature(0.7)
            .with_system("Be brief");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.system.as_deref(), Some("Be brief"));
    }

    #[test]
    fn test_usage_totals() {
        let usage = GenerationUsage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }
}
