//! Retrieval-augmented answering.
//!
//! A [`RagPipeline`] retrieves the documents most similar to a question,
//! renders them into a prompt and hands it to a [`medrag_llm::Generator`].

pub mod pipeline;
pub mod prompt;
pub mod types;

pub use pipeline::RagPipeline;
pub use prompt::PromptTemplate;
pub use types::{RagAnswer, RagOptions, SourceRef};
