//! Search command handler.
//!
//! Prints retrieval results without generating an answer.

use clap::Args;
use medrag_core::{config::AppConfig, AppResult};
use medrag_knowledge::rag::types::{truncate_snippet, MAX_SNIPPET_LENGTH};

/// Show the documents most similar to a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of documents to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let top_k = self.top_k.unwrap_or(config.rag.top_k);
        let retriever = super::build_retriever(config).await?;
        let results = retriever.retrieve_scored(&self.query, top_k).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("No relevant documents found.");
            return Ok(());
        }

        for (rank, result) in results.iter().enumerate() {
            println!(
                "{}. {} (score: {:.3})",
                rank + 1,
                result.document.id,
                result.score
            );
            println!(
                "   {}",
                truncate_snippet(&result.document.text, MAX_SNIPPET_LENGTH)
            );
        }

        Ok(())
    }
}
