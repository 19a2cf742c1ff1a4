//! Generator factory.
//!
//! Builds the configured generator backend once, so callers can share a single
//! model instance across queries.

use std::sync::Arc;
use std::time::Duration;

use crate::client::Generator;
use crate::guard::SerializedGenerator;
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::providers::{ExtractiveGenerator, OllamaGenerator};
use medrag_core::config::GeneratorConfig;
use medrag_core::{AppError, AppResult};

/// Create a generator from configuration.
///
/// When `config.serialize` is set the backend is wrapped in a
/// [`SerializedGenerator`], so concurrent callers take turns on the model.
///
/// # Errors
/// Returns `AppError::Config` for unknown backends or an unusable HTTP client.
pub fn create_generator(config: &GeneratorConfig) -> AppResult<Arc<dyn Generator>> {
    let backend: Arc<dyn Generator> = match config.provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = config.endpoint.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
            let timeout = config.timeout_secs.map(Duration::from_secs);
            Arc::new(OllamaGenerator::with_base_url(
                base_url,
                config.model.clone(),
                timeout,
            )?)
        }
        "extractive" => Arc::new(ExtractiveGenerator::new()),
        other => {
            return Err(AppError::Config(format!(
                "Unknown generator: '{}'. Supported generators: ollama, extractive",
                other
            )))
        }
    };

    tracing::debug!(
        provider = backend.provider_name(),
        model = backend.model_name(),
        serialize = config.serialize,
        "Created generator"
    );

    if config.serialize {
        Ok(Arc::new(SerializedGenerator::new(backend)))
    } else {
        Ok(backend)
    }
}
