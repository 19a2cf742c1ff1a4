//! MedRAG CLI
//!
//! Main entry point for the medrag command-line tool.
//! Answers questions over a small clinical knowledge base.

mod commands;
mod knowledge_file;

use clap::{Parser, Subcommand};
use commands::{AskCommand, SearchCommand};
use medrag_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// MedRAG - question answering over clinical notes
#[derive(Parser, Debug)]
#[command(name = "medrag")]
#[command(about = "Retrieval-augmented question answering over clinical notes", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "MEDRAG_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "MEDRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generator backend (ollama, extractive)
    #[arg(short, long, global = true, env = "MEDRAG_GENERATOR")]
    generator: Option<String>,

    /// Generator model identifier
    #[arg(short, long, global = true, env = "MEDRAG_MODEL")]
    model: Option<String>,

    /// YAML knowledge base file (default: built-in clinical notes)
    #[arg(long, global = true, env = "MEDRAG_KNOWLEDGE_BASE")]
    knowledge_base: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question from the knowledge base
    Ask(AskCommand),

    /// Show the documents most similar to a query
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment and config file
    let mut config = AppConfig::load()?;
    if let Some(path) = &cli.config {
        config = config.merge_yaml(path)?;
    }

    // Apply CLI overrides
    let mut config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.generator,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    if let Some(knowledge_base) = cli.knowledge_base {
        config.knowledge_base = Some(knowledge_base);
    }

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("MedRAG CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!(
        "Embedder: {} ({})",
        config.embedding.provider,
        config.embedding.model
    );
    tracing::debug!(
        "Generator: {} ({})",
        config.generator.provider,
        config.generator.model
    );

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
