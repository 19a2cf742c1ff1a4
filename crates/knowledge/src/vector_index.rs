//! Vector index abstraction for knowledge documents.
//!
//! Defines a trait for read-only similarity search plus an exact brute-force
//! implementation, which is all a corpus of tens of documents needs.

use std::cmp::Ordering;

use crate::types::{Document, ScoredDocument};
use medrag_core::{AppError, AppResult};

/// Trait for vector index backends.
///
/// Indexes are immutable after construction and safe to share between
/// concurrent readers.
pub trait VectorIndex: Send + Sync {
    /// Search for the top-k most similar documents to the query embedding.
    ///
    /// Returns at most `min(top_k, len())` documents ordered by descending
    /// similarity, ties broken by ascending document id.
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<ScoredDocument>>;

    /// Number of indexed documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension shared by every stored vector.
    fn dimensions(&self) -> usize;
}

/// Exact nearest-neighbor index using cosine similarity.
///
/// Vectors are normalized once at build time so each search is a dot product
/// per document.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl FlatIndex {
    /// Build an index from documents and their embeddings, paired by position.
    ///
    /// # Errors
    /// - `EmptyCorpus` when `documents` is empty
    /// - `Config` when the two sequences differ in length
    /// - `DimensionMismatch` when vectors differ in length or are empty
    pub fn build(documents: Vec<Document>, vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        if documents.is_empty() {
            return Err(AppError::EmptyCorpus);
        }

        if documents.len() != vectors.len() {
            return Err(AppError::Config(format!(
                "Got {} embeddings for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let dimensions = vectors[0].len();
        if dimensions == 0 {
            return Err(AppError::DimensionMismatch {
                expected: 1,
                found: 0,
            });
        }

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(AppError::DimensionMismatch {
                expected: dimensions,
                found: bad.len(),
            });
        }

        let vectors = vectors.into_iter().map(normalized).collect();

        tracing::debug!(
            documents = documents.len(),
            dimensions,
            "Built flat vector index"
        );

        Ok(Self {
            documents,
            vectors,
            dimensions,
        })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<ScoredDocument>> {
        if top_k == 0 {
            return Err(AppError::InvalidQuery(
                "top_k must be at least 1".to_string(),
            ));
        }

        if query_embedding.len() != self.dimensions {
            return Err(AppError::DimensionMismatch {
                expected: self.dimensions,
                found: query_embedding.len(),
            });
        }

        let query = normalized(query_embedding.to_vec());

        let mut scored: Vec<ScoredDocument> = self
            .documents
            .iter()
            .zip(&self.vectors)
            .map(|(document, v)| ScoredDocument {
                document: document.clone(),
                score: canonical_zero(dot(&query, v)),
            })
            .collect();

        scored.sort_by(rank_order);
        scored.truncate(top_k);

        Ok(scored)
    }

    fn len(&self) -> usize {
        self.documents.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale to unit length; zero vectors stay zero.
fn normalized(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// `-0.0` and `0.0` must tie under `total_cmp`.
fn canonical_zero(score: f32) -> f32 {
    if score == 0.0 {
        0.0
    } else {
        score
    }
}

/// Order used by every index: descending score, then ascending id.
pub fn rank_order(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.document.id.cmp(&b.document.id))
}
