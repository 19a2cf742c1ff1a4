//! Embedding providers for the knowledge base.
//!
//! Providers are selected by [`medrag_core::config::EmbeddingConfig`] and shared
//! behind `Arc<dyn EmbeddingProvider>`.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
