//! Knowledge base type definitions.

use serde::{Deserialize, Serialize};

/// Immutable unit of knowledge base content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier; also the tie-breaker between equally similar documents
    pub id: String,

    /// Plain-text content
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A document paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,

    /// Cosine similarity in [-1, 1]
    pub score: f32,
}

/// Static, ordered collection of documents supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    documents: Vec<Document>,
}

impl KnowledgeBase {
    /// Wrap caller-provided documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build a knowledge base from plain texts.
    ///
    /// Identifiers are zero-padded positions (`doc-0000`, `doc-0001`, ...) so
    /// that identifier order matches insertion order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Document::new(format!("doc-{:04}", i), text))
            .collect();
        Self { documents }
    }

    /// The reference clinical notes used by the insight dashboard.
    pub fn clinical_notes() -> Self {
        Self::from_texts([
            "Cardiomegaly is enlargement of the heart and may require echocardiogram.",
            "Pneumonia treatment involves antibiotics and monitoring.",
            "Pleural effusion may require drainage and imaging follow-up.",
        ])
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}
