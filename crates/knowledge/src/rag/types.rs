//! RAG answer types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ScoredDocument;
use medrag_core::config::RagConfig;

/// Maximum snippet length for source references, in characters.
pub const MAX_SNIPPET_LENGTH: usize = 150;

/// A document that was placed in the prompt for an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Document identifier
    pub id: String,

    /// Short snippet of the document text (truncated if needed)
    pub snippet: String,

    /// Similarity to the question
    pub score: f32,
}

impl From<&ScoredDocument> for SourceRef {
    fn from(scored: &ScoredDocument) -> Self {
        Self {
            id: scored.document.id.clone(),
            snippet: truncate_snippet(&scored.document.text, MAX_SNIPPET_LENGTH),
            score: scored.score,
        }
    }
}

/// Generated answer together with the documents it was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Generator output, verbatim
    pub answer: String,

    /// Documents used as context, most relevant first
    pub sources: Vec<SourceRef>,

    /// Highest similarity among the sources; 0.0 when there are none
    pub max_score: f32,

    /// Whether the generator ran out of tokens
    pub truncated: bool,
}

impl RagAnswer {
    pub fn new(answer: String, sources: Vec<SourceRef>, truncated: bool) -> Self {
        let max_score = sources.first().map(|s| s.score).unwrap_or(0.0);

        Self {
            answer,
            sources,
            max_score,
            truncated,
        }
    }
}

/// Per-pipeline answering options.
#[derive(Debug, Clone, PartialEq)]
pub struct RagOptions {
    /// Number of documents retrieved per question
    pub top_k: usize,

    /// Token budget for the generated answer
    pub max_tokens: u32,

    /// Deadline applied by `answer` and `ask`; none means wait indefinitely
    pub timeout: Option<Duration>,
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_tokens: 100,
            timeout: None,
        }
    }
}

impl From<&RagConfig> for RagOptions {
    fn from(config: &RagConfig) -> Self {
        Self {
            top_k: config.top_k,
            max_tokens: config.max_tokens,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Truncate text to at most `max_chars` characters, adding an ellipsis.
///
/// Cuts at the last word boundary when one is close to the limit.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > cut.len() / 2 => &cut[..pos],
        _ => cut.as_str(),
    };

    format!("{}...", cut.trim_end())
}
