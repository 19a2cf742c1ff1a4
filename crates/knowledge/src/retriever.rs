//! Query-side retrieval over a vector index.

use std::sync::Arc;

use crate::embeddings::EmbeddingProvider;
use crate::types::{Document, KnowledgeBase, ScoredDocument};
use crate::vector_index::{FlatIndex, VectorIndex};
use medrag_core::{AppError, AppResult};

/// Embeds queries and looks them up in a shared, read-only index.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    /// Results scoring below this similarity are dropped
    min_score: Option<f32>,
}

impl Retriever {
    /// Wrap an existing index. The provider must be the one that built it.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            provider,
            index,
            min_score: None,
        }
    }

    /// Embed every document of the knowledge base in one batch and index it.
    ///
    /// # Errors
    /// - `EmptyCorpus` for an empty knowledge base (checked before embedding)
    /// - `EmbeddingUnavailable` when the provider fails
    /// - `DimensionMismatch` when the provider returns inconsistent vectors
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        knowledge_base: KnowledgeBase,
    ) -> AppResult<Self> {
        if knowledge_base.is_empty() {
            return Err(AppError::EmptyCorpus);
        }

        tracing::info!(
            "Embedding {} documents using provider '{}' (model: {})",
            knowledge_base.len(),
            provider.provider_name(),
            provider.model_name()
        );

        let vectors = provider.embed_batch(&knowledge_base.texts()).await?;
        let index = FlatIndex::build(knowledge_base.into_documents(), vectors)?;

        Ok(Self::new(provider, Arc::new(index)))
    }

    /// Drop results whose similarity falls below `min_score`.
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Retrieve up to `k` documents, most similar first.
    pub async fn retrieve(&self, query: &str, k: usize) -> AppResult<Vec<Document>> {
        Ok(self
            .retrieve_scored(query, k)
            .await?
            .into_iter()
            .map(|scored| scored.document)
            .collect())
    }

    /// Retrieve up to `k` documents together with their similarity scores.
    ///
    /// `k` larger than the corpus returns the whole corpus.
    pub async fn retrieve_scored(&self, query: &str, k: usize) -> AppResult<Vec<ScoredDocument>> {
        if self.index.is_empty() {
            return Err(AppError::EmptyIndex);
        }

        let query_embedding = self.provider.embed(query).await?;
        let mut results = self.index.search(&query_embedding, k)?;

        let retrieved = results.len();
        if let Some(min_score) = self.min_score {
            results.retain(|r| r.score >= min_score);
        }

        tracing::debug!(
            retrieved,
            kept = results.len(),
            max_score = results.first().map(|r| r.score),
            "Retrieved documents"
        );

        Ok(results)
    }
}
