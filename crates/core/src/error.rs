//! Error types for MedRAG.
//!
//! This module defines a unified error enum covering the failure modes of the
//! retrieval-augmented answering pipeline, plus the ambient configuration,
//! I/O and serialization errors of the surrounding application.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for MedRAG.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Errors are represented and propagated, never swallowed.
#[derive(Error, Debug)]
pub enum AppError {
    /// Index construction attempted with zero documents
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// Embedding vectors of inconsistent length
    #[error("Embedding dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Embedding model failed to load or errored during inference
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Retrieval attempted against an index holding zero documents
    #[error("Cannot retrieve from an empty index")]
    EmptyIndex,

    /// Generative model failed to run
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// Empty or malformed query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Caller-imposed deadline exceeded
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = AppError::DimensionMismatch {
            expected: 384,
            found: 768,
        };
        assert_eq!(
            err.to_string(),
            "Embedding dimension mismatch: expected 384, found 768"
        );
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parsed: Result<Vec<String>, _> = serde_yaml::from_str("{ not: [a list");
        let err: AppError = parsed.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
