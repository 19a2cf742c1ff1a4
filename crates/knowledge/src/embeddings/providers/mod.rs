//! Embedding provider implementations.

pub mod ollama;
pub mod trigram;

pub use ollama::OllamaEmbedder;
pub use trigram::TrigramProvider;
