//! Ask command handler.
//!
//! Answers a question with retrieval-augmented generation.

use clap::Args;
use medrag_core::{config::AppConfig, AppError, AppResult};
use medrag_knowledge::{PromptTemplate, RagAnswer, RagOptions, RagPipeline};
use medrag_llm::create_generator;
use medrag_llm::providers::extractive::{CONTEXT_HEADER, QUESTION_HEADER};
use medrag_llm::ExtractiveGenerator;
use std::sync::Arc;
use std::time::Duration;

/// Answer a question from the knowledge base
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Number of documents to retrieve as context
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Maximum tokens in the answer
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let options = self.options(config);
        let template = prompt_template(config)?;
        let retriever = Arc::new(super::build_retriever(config).await?);
        let generator = create_generator(&config.generator)?;

        let mut pipeline = RagPipeline::new(retriever, generator, options);
        if let Some(template) = template {
            pipeline = pipeline.with_template(template);
        }

        let answer = pipeline.ask(&self.question).await?;

        tracing::debug!(
            "RAG answer: max_score={:.3}, sources={}, truncated={}",
            answer.max_score,
            answer.sources.len(),
            answer.truncated
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            print_answer(&answer);
        }

        Ok(())
    }

    /// Merge command flags over the configured answering options.
    fn options(&self, config: &AppConfig) -> RagOptions {
        let mut options = RagOptions::from(&config.rag);

        if let Some(top_k) = self.top_k {
            options.top_k = top_k;
        }
        if let Some(max_tokens) = self.max_tokens {
            options.max_tokens = max_tokens;
        }
        if let Some(timeout) = self.timeout {
            options.timeout = Some(Duration::from_secs(timeout));
        }

        options
    }
}

/// Compile the configured prompt template, if any.
///
/// The extractive generator only reads context laid out under its own
/// headings, so templates without them are rejected up front.
fn prompt_template(config: &AppConfig) -> AppResult<Option<PromptTemplate>> {
    let Some(template) = &config.rag.prompt_template else {
        return Ok(None);
    };

    if config.generator.provider == "extractive" && !ExtractiveGenerator::supports_template(template)
    {
        return Err(AppError::Config(format!(
            "rag.promptTemplate must contain '{}' and '{}' headings when using the extractive generator",
            CONTEXT_HEADER, QUESTION_HEADER
        )));
    }

    Ok(Some(PromptTemplate::new(template)?))
}

fn print_answer(answer: &RagAnswer) {
    println!("Answer:");
    println!("{}", answer.answer);
    println!();

    if answer.sources.is_empty() {
        println!("Sources: (no relevant documents)");
    } else {
        println!("Sources:");
        for source in &answer.sources {
            println!("- {} ({:.3}): {}", source.id, source.score, source.snippet);
        }
    }
}
