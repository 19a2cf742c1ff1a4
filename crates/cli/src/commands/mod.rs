//! Command handlers for the MedRAG CLI.

pub mod ask;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use search::SearchCommand;

use crate::knowledge_file;
use medrag_core::{config::AppConfig, AppResult};
use medrag_knowledge::{create_provider, KnowledgeBase, Retriever};

/// Load the configured knowledge base, falling back to the built-in notes.
pub fn load_knowledge_base(config: &AppConfig) -> AppResult<KnowledgeBase> {
    match config.knowledge_base_path() {
        Some(path) => knowledge_file::load(&path),
        None => {
            tracing::debug!("Using built-in clinical notes");
            Ok(KnowledgeBase::clinical_notes())
        }
    }
}

/// Embed the knowledge base and build the retriever used by every command.
pub async fn build_retriever(config: &AppConfig) -> AppResult<Retriever> {
    let knowledge_base = load_knowledge_base(config)?;
    let provider = create_provider(&config.embedding)?;

    let retriever = Retriever::build(provider, knowledge_base)
        .await?
        .with_min_score(config.rag.min_score);

    Ok(retriever)
}
