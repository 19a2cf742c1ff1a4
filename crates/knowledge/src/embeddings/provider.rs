//! Embedding provider trait and factory.

use medrag_core::config::EmbeddingConfig;
use medrag_core::{AppError, AppResult};
use std::sync::Arc;

use super::providers::{OllamaEmbedder, TrigramProvider};

/// Trait for embedding providers.
///
/// Providers are read-only after construction and shared across concurrent
/// queries without locking. Model failures surface as
/// `AppError::EmbeddingUnavailable`.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results.pop().ok_or_else(|| {
            AppError::EmbeddingUnavailable(format!(
                "{} returned no embedding",
                self.provider_name()
            ))
        })
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    if config.dimensions == 0 {
        return Err(AppError::Config(
            "Embedding dimensions must be greater than zero".to_string(),
        ));
    }

    let provider: Arc<dyn EmbeddingProvider> = match config.provider.as_str() {
        "trigram" => Arc::new(TrigramProvider::new(config.dimensions)),
        "ollama" => Arc::new(OllamaEmbedder::new(config)?),
        _ => {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
                config.provider
            )))
        }
    };

    tracing::debug!(
        "Created embedding provider: provider={}, model={}, dimensions={}",
        provider.provider_name(),
        provider.model_name(),
        provider.dimensions()
    );

    Ok(provider)
}
