//! Generator backends.

pub mod extractive;
pub mod ollama;

pub use extractive::ExtractiveGenerator;
pub use ollama::OllamaGenerator;
