//! Knowledge base retrieval and answering for MedRAG.
//!
//! Documents are embedded once into an in-memory [`FlatIndex`]; questions are
//! answered by a [`RagPipeline`] that retrieves the closest documents and
//! hands them to a generator.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use medrag_knowledge::{KnowledgeBase, RagOptions, RagPipeline, Retriever};
//! use medrag_knowledge::embeddings::providers::TrigramProvider;
//! use medrag_llm::ExtractiveGenerator;
//!
//! # async fn example() -> medrag_core::AppResult<()> {
//! let retriever = Retriever::build(
//!     Arc::new(TrigramProvider::new(384)),
//!     KnowledgeBase::clinical_notes(),
//! )
//! .await?;
//! let pipeline = RagPipeline::new(
//!     Arc::new(retriever),
//!     Arc::new(ExtractiveGenerator::new()),
//!     RagOptions::default(),
//! );
//! println!("{}", pipeline.answer("What is pleural effusion?").await?);
//! # Ok(())
//! # }
//! ```

pub mod embeddings;
pub mod rag;
pub mod retriever;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingProvider};
pub use rag::{PromptTemplate, RagAnswer, RagOptions, RagPipeline, SourceRef};
pub use retriever::Retriever;
pub use types::{Document, KnowledgeBase, ScoredDocument};
pub use vector_index::{FlatIndex, VectorIndex};
