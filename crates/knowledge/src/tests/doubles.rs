//! Embedders, generators and indexes with scripted behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::embeddings::EmbeddingProvider;
use crate::types::ScoredDocument;
use crate::vector_index::VectorIndex;
use medrag_core::{AppError, AppResult};
use medrag_llm::{Generation, GenerationRequest, GenerationUsage, Generator};

/// Keyword groups, one per embedding axis.
const AXES: [&[&str]; 3] = [
    &["heart", "cardio", "echocardiogram", "enlarge"],
    &["pneumonia", "antibiotic", "lung", "infection"],
    &["pleural", "effusion", "drainage", "fluid"],
];

/// Embeds text by counting keyword hits per clinical topic.
#[derive(Debug, Default)]
pub struct KeywordEmbedder;

impl KeywordEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        AXES.iter()
            .map(|keywords| {
                keywords
                    .iter()
                    .map(|k| lower.matches(k).count())
                    .sum::<usize>() as f32
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn provider_name(&self) -> &str {
        "keyword"
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }

    fn dimensions(&self) -> usize {
        AXES.len()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Embedder whose model is never reachable.
#[derive(Debug, Default)]
pub struct FailingEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "none"
    }

    fn dimensions(&self) -> usize {
        3
    }

    async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Err(AppError::EmbeddingUnavailable(
            "embedding model not loaded".to_string(),
        ))
    }
}

/// Embedder that returns vectors of a different length for each text.
#[derive(Debug, Default)]
pub struct RaggedEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for RaggedEmbedder {
    fn provider_name(&self) -> &str {
        "ragged"
    }

    fn model_name(&self) -> &str {
        "ragged-test"
    }

    fn dimensions(&self) -> usize {
        1
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, _)| vec![1.0; i + 1])
            .collect())
    }
}

/// Index that holds no documents.
pub struct EmptyVectorIndex;

impl VectorIndex for EmptyVectorIndex {
    fn search(&self, _query_embedding: &[f32], _top_k: usize) -> AppResult<Vec<ScoredDocument>> {
        Ok(Vec::new())
    }

    fn len(&self) -> usize {
        0
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Generator that records every prompt and answers with a fixed reply.
#[derive(Debug)]
pub struct RecordingGenerator {
    reply: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl RecordingGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering, to exercise deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Generator for RecordingGenerator {
    fn provider_name(&self) -> &str {
        "recording"
    }

    fn model_name(&self) -> &str {
        "recording-test"
    }

    async fn complete(&self, request: &GenerationRequest) -> AppResult<Generation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(Generation {
            content: self.reply.clone(),
            model: "recording-test".to_string(),
            usage: GenerationUsage::new(0, 0),
            truncated: false,
        })
    }
}

/// Generator whose model is never reachable.
#[derive(Debug, Default)]
pub struct FailingGenerator;

#[async_trait::async_trait]
impl Generator for FailingGenerator {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "none"
    }

    async fn complete(&self, _request: &GenerationRequest) -> AppResult<Generation> {
        Err(AppError::GenerationUnavailable(
            "generator model not loaded".to_string(),
        ))
    }
}
