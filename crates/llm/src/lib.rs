//! Generative model integration for MedRAG.
//!
//! This crate provides a backend-agnostic abstraction over the model that
//! writes answers. Backends are swappable behind the [`Generator`] trait so the
//! answering pipeline can run against a local model server or a deterministic
//! offline generator.
//!
//! # Backends
//! - **Ollama**: Local LLM runtime (default)
//! - **Extractive**: Offline, quotes retrieved context back
//!
//! # Example
//! ```no_run
//! use medrag_llm::{Generator, providers::OllamaGenerator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = OllamaGenerator::new("llama3.2");
//! let answer = generator.generate("What is cardiomegaly?", 100).await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod guard;
pub mod providers;

// Re-export main types
pub use client::{Generation, GenerationRequest, GenerationUsage, Generator};
pub use factory::create_generator;
pub use guard::SerializedGenerator;
pub use providers::{ExtractiveGenerator, OllamaGenerator};
