//! RAG answering orchestration.
//!
//! Each question is an independent read-only pass: retrieve, render the
//! prompt, generate. Nothing is cached between calls.

use std::sync::Arc;
use std::time::Duration;

use crate::rag::prompt::PromptTemplate;
use crate::rag::types::{RagAnswer, RagOptions, SourceRef};
use crate::retriever::Retriever;
use medrag_core::{AppError, AppResult};
use medrag_llm::{GenerationRequest, Generator};

/// Answers questions over a fixed knowledge base.
///
/// Holds shared handles to the retriever and generator, so one pipeline can
/// serve many concurrent callers.
pub struct RagPipeline {
    retriever: Arc<Retriever>,
    generator: Arc<dyn Generator>,
    template: PromptTemplate,
    options: RagOptions,
}

impl RagPipeline {
    pub fn new(
        retriever: Arc<Retriever>,
        generator: Arc<dyn Generator>,
        options: RagOptions,
    ) -> Self {
        Self {
            retriever,
            generator,
            template: PromptTemplate::default(),
            options,
        }
    }

    /// Replace the built-in prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    /// Answer a question, returning the generated text verbatim.
    pub async fn answer(&self, question: &str) -> AppResult<String> {
        Ok(self.ask(question).await?.answer)
    }

    /// Answer a question and report which documents were used.
    ///
    /// Applies the configured default deadline, if any.
    ///
    /// # Errors
    /// - `InvalidQuery` for an empty or whitespace-only question
    /// - `EmptyIndex`, `EmbeddingUnavailable` from retrieval
    /// - `GenerationUnavailable` from the generator
    /// - `Timeout` when the default deadline expires
    pub async fn ask(&self, question: &str) -> AppResult<RagAnswer> {
        match self.options.timeout {
            Some(deadline) => self.ask_within(question, deadline).await,
            None => self.run(question).await,
        }
    }

    /// Like [`answer`](Self::answer), failing with `Timeout` after `deadline`.
    pub async fn answer_within(&self, question: &str, deadline: Duration) -> AppResult<String> {
        Ok(self.ask_within(question, deadline).await?.answer)
    }

    /// Like [`ask`](Self::ask), failing with `Timeout` after `deadline`.
    ///
    /// The in-flight call is dropped on expiry; the pipeline stays usable.
    pub async fn ask_within(&self, question: &str, deadline: Duration) -> AppResult<RagAnswer> {
        match tokio::time::timeout(deadline, self.run(question)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Answer exceeded deadline of {:?}", deadline);
                Err(AppError::Timeout(deadline))
            }
        }
    }

    async fn run(&self, question: &str) -> AppResult<RagAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidQuery(
                "question must not be empty".to_string(),
            ));
        }

        tracing::info!("Answering question: {}", question);

        let retrieved = self
            .retriever
            .retrieve_scored(question, self.options.top_k)
            .await?;

        if retrieved.is_empty() {
            tracing::warn!("No relevant documents found; answering without context");
        } else {
            tracing::debug!(
                "Using {} documents as context (max score: {:.3})",
                retrieved.len(),
                retrieved[0].score
            );
        }

        let texts: Vec<&str> = retrieved.iter().map(|r| r.document.text.as_str()).collect();
        let prompt = self.template.render(question, &texts)?;

        let request = GenerationRequest::new(prompt, self.options.max_tokens);
        let generation = self.generator.complete(&request).await?;

        if generation.truncated {
            tracing::debug!(
                "Answer truncated at {} tokens",
                self.options.max_tokens
            );
        }

        let sources = retrieved.iter().map(SourceRef::from).collect();
        Ok(RagAnswer::new(generation.content, sources, generation.truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::doubles::{FailingGenerator, KeywordEmbedder, RecordingGenerator};
    use crate::types::KnowledgeBase;

    async fn pipeline(generator: Arc<dyn Generator>) -> RagPipeline {
        let retriever = Retriever::build(Arc::new(KeywordEmbedder), KnowledgeBase::clinical_notes())
            .await
            .unwrap();
        RagPipeline::new(Arc::new(retriever), generator, RagOptions::default())
    }

    #[tokio::test]
    async fn test_answer_returned_verbatim() {
        let generator = Arc::new(RecordingGenerator::new("  Antibiotics.\n"));
        let pipeline = pipeline(generator.clone()).await;

        let answer = pipeline.answer("How is pneumonia treated?").await.unwrap();

        assert_eq!(answer, "  Antibiotics.\n");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_question_rejected_before_generation() {
        let generator = Arc::new(RecordingGenerator::new("unused"));
        let pipeline = pipeline(generator.clone()).await;

        let result = pipeline.answer(" \t\n").await;

        assert!(matches!(result, Err(AppError::InvalidQuery(_))));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_prompt_lists_context_in_retrieval_order() {
        let generator = Arc::new(RecordingGenerator::new("ok"));
        let pipeline = pipeline(generator.clone()).await;

        let answer = pipeline.ask("antibiotics for pneumonia").await.unwrap();
        let prompt = generator.last_prompt().unwrap();

        let pneumonia = prompt.find("- Pneumonia treatment").unwrap();
        let question = prompt.find("Question: antibiotics for pneumonia").unwrap();
        assert!(pneumonia < question);
        assert_eq!(answer.sources.len(), 3);
        assert_eq!(answer.sources[0].id, "doc-0001");
        assert!(answer.max_score > 0.99);
    }

    #[tokio::test]
    async fn test_top_k_limits_sources() {
        let generator = Arc::new(RecordingGenerator::new("ok"));
        let retriever = Retriever::build(Arc::new(KeywordEmbedder), KnowledgeBase::clinical_notes())
            .await
            .unwrap();
        let options = RagOptions {
            top_k: 1,
            ..RagOptions::default()
        };
        let pipeline = RagPipeline::new(Arc::new(retriever), generator.clone(), options);

        let answer = pipeline.ask("pleural drainage").await.unwrap();

        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].id, "doc-0002");
        let prompt = generator.last_prompt().unwrap();
        assert!(!prompt.contains("Cardiomegaly"));
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let pipeline = pipeline(Arc::new(FailingGenerator)).await;

        let result = pipeline.answer("What is cardiomegaly?").await;
        assert!(matches!(result, Err(AppError::GenerationUnavailable(_))));
    }

    #[tokio::test]
    async fn test_custom_template() {
        let generator = Arc::new(RecordingGenerator::new("ok"));
        let template = PromptTemplate::new("Q={{question}} N={{len documents}}").unwrap();
        let pipeline = pipeline(generator.clone()).await.with_template(template);

        pipeline.answer("heart").await.unwrap();

        assert_eq!(generator.last_prompt().unwrap(), "Q=heart N=3");
    }

    #[tokio::test]
    async fn test_default_deadline_applies_to_ask() {
        let generator =
            Arc::new(RecordingGenerator::new("late").with_delay(Duration::from_millis(500)));
        let retriever = Retriever::build(Arc::new(KeywordEmbedder), KnowledgeBase::clinical_notes())
            .await
            .unwrap();
        let options = RagOptions {
            timeout: Some(Duration::from_millis(20)),
            ..RagOptions::default()
        };
        let pipeline = RagPipeline::new(Arc::new(retriever), generator, options);

        let result = pipeline.ask("heart").await;
        assert!(matches!(result, Err(AppError::Timeout(d)) if d == Duration::from_millis(20)));
    }
}
