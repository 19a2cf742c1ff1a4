//! Extractive generator for offline operation.
//!
//! Answers by quoting the context section of the prompt back, cut to the token
//! budget. It needs no model server and is fully deterministic, which makes it
//! the backend of choice for demos without Ollama and for tests.

use crate::client::{Generation, GenerationRequest, GenerationUsage, Generator};
use medrag_core::AppResult;

/// Heading that opens the context section of a prompt.
pub const CONTEXT_HEADER: &str = "Context:";

/// Heading that closes the context section of a prompt.
pub const QUESTION_HEADER: &str = "Question:";

/// Answer given when the prompt carries no context.
pub const NO_CONTEXT_ANSWER: &str =
    "I could not find relevant information in the knowledge base.";

/// Deterministic generator quoting the prompt's context.
#[derive(Debug, Default)]
pub struct ExtractiveGenerator;

impl ExtractiveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Whether a prompt template lays out the headings this generator reads.
    pub fn supports_template(template: &str) -> bool {
        template.contains(CONTEXT_HEADER) && template.contains(QUESTION_HEADER)
    }

    /// Lines between the context and question headings, without list markers.
    ///
    /// The question heading is the last one in the prompt, so document text
    /// quoting either heading stays inside the context.
    fn extract_context(prompt: &str) -> Vec<&str> {
        let Some(start) = prompt.find(CONTEXT_HEADER) else {
            return Vec::new();
        };
        let body = &prompt[start + CONTEXT_HEADER.len()..];
        let body = match body.rfind(QUESTION_HEADER) {
            Some(end) => &body[..end],
            None => body,
        };

        body.lines()
            .map(|line| line.trim().trim_start_matches("- ").trim())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[async_trait::async_trait]
impl Generator for ExtractiveGenerator {
    fn provider_name(&self) -> &str {
        "extractive"
    }

    fn model_name(&self) -> &str {
        "extractive-v1"
    }

    async fn complete(&self, request: &GenerationRequest) -> AppResult<Generation> {
        let context = Self::extract_context(&request.prompt);
        let source = if context.is_empty() {
            NO_CONTEXT_ANSWER.to_string()
        } else {
            context.join(" ")
        };

        let tokens: Vec<&str> = source.split_whitespace().collect();
        let budget = request.max_tokens as usize;
        let truncated = tokens.len() > budget;
        let kept = &tokens[..tokens.len().min(budget)];

        tracing::debug!(
            context_lines = context.len(),
            emitted = kept.len(),
            truncated,
            "Extractive generation"
        );

        Ok(Generation {
            content: kept.join(" "),
            model: self.model_name().to_string(),
            usage: GenerationUsage::new(
                request.prompt.split_whitespace().count() as u32,
                kept.len() as u32,
            ),
            truncated,
        })
    }
}
