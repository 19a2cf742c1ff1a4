//! YAML knowledge base files.
//!
//! ```yaml
//! documents:
//!   - id: pleural
//!     text: Pleural effusion may require drainage and imaging follow-up.
//!   - text: Pneumonia treatment involves antibiotics and monitoring.
//! ```
//!
//! Documents without an `id` get the positional identifier `doc-NNNN`.

use medrag_core::{AppError, AppResult};
use medrag_knowledge::{Document, KnowledgeBase};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    documents: Vec<DocumentEntry>,
}

#[derive(Debug, Deserialize)]
struct DocumentEntry {
    id: Option<String>,
    text: String,
}

/// Load a knowledge base from a YAML file.
pub fn load(path: &Path) -> AppResult<KnowledgeBase> {
    tracing::debug!("Loading knowledge base from {:?}", path);

    let content = std::fs::read_to_string(path)?;
    let knowledge_base = parse(&content)?;

    tracing::info!(
        "Loaded {} documents from {:?}",
        knowledge_base.len(),
        path
    );

    Ok(knowledge_base)
}

/// Parse knowledge base YAML; identifiers must be unique.
pub fn parse(content: &str) -> AppResult<KnowledgeBase> {
    let file: KnowledgeFile = serde_yaml::from_str(content)?;

    let mut seen = HashSet::new();
    let mut documents = Vec::with_capacity(file.documents.len());

    for (position, entry) in file.documents.into_iter().enumerate() {
        let id = entry
            .id
            .unwrap_or_else(|| format!("doc-{:04}", position));

        if !seen.insert(id.clone()) {
            return Err(AppError::Config(format!(
                "Duplicate document id in knowledge base: {}",
                id
            )));
        }

        documents.push(Document::new(id, entry.text));
    }

    Ok(KnowledgeBase::new(documents))
}
