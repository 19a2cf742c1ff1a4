//! Configuration management for MedRAG.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - The workspace config file (`.medrag/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! The embedding, generator and retrieval sections are plain serde types so the
//! knowledge and LLM crates can consume them directly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Embedding providers understood by the knowledge crate.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Upper bound on `embedding.maxRetries`.
pub const MAX_EMBEDDING_RETRIES: u32 = 10;

/// Generator backends understood by the LLM crate.
pub const KNOWN_GENERATORS: [&str; 2] = ["ollama", "extractive"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .medrag/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Embedding provider settings
    pub embedding: EmbeddingConfig,

    /// Generator settings
    pub generator: GeneratorConfig,

    /// Retrieval and answering settings
    pub rag: RagConfig,

    /// Optional YAML knowledge base file; the built-in notes are used otherwise
    pub knowledge_base: Option<PathBuf>,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingConfig {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Endpoint for remote providers
    pub endpoint: Option<String>,

    /// Extra attempts after a failed embedding request (0 = fail fast)
    pub max_retries: u32,

    /// Per-request timeout in seconds for remote providers
    pub timeout_secs: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
            max_retries: 0,
            timeout_secs: None,
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Backend name: "ollama" or "extractive"
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Endpoint for remote backends
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds for remote backends
    pub timeout_secs: Option<u64>,

    /// Serialize calls to the underlying model instance
    pub serialize: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            endpoint: None,
            timeout_secs: None,
            serialize: true,
        }
    }
}

/// Retrieval and answering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RagConfig {
    /// Number of documents retrieved per question
    pub top_k: usize,

    /// Token budget for generated answers
    pub max_tokens: u32,

    /// Deadline for a whole answer call, in seconds
    pub timeout_secs: Option<u64>,

    /// Drop retrieved documents scoring below this similarity
    pub min_score: Option<f32>,

    /// Handlebars template replacing the built-in answer prompt
    pub prompt_template: Option<String>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_tokens: 100,
            timeout_secs: None,
            min_score: None,
            prompt_template: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    workspace: Option<WorkspaceSection>,
    logging: Option<LoggingSection>,
    embedding: Option<EmbeddingConfig>,
    generator: Option<GeneratorConfig>,
    rag: Option<RagConfig>,
    knowledge_base: Option<KnowledgeBaseSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KnowledgeBaseSection {
    path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            embedding: EmbeddingConfig::default(),
            generator: GeneratorConfig::default(),
            rag: RagConfig::default(),
            knowledge_base: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the config file and defaults.
    ///
    /// Environment variables:
    /// - `MEDRAG_WORKSPACE`: Override workspace path
    /// - `MEDRAG_CONFIG`: Path to config file
    /// - `MEDRAG_GENERATOR`: Generator backend
    /// - `MEDRAG_MODEL`: Generator model identifier
    /// - `MEDRAG_EMBEDDER`: Embedding provider
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use medrag_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Top-k: {}", config.rag.top_k);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("MEDRAG_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("MEDRAG_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.medrag_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(generator) = std::env::var("MEDRAG_GENERATOR") {
            config.generator.provider = generator;
        }

        if let Ok(model) = std::env::var("MEDRAG_MODEL") {
            config.generator.model = model;
        }

        if let Ok(embedder) = std::env::var("MEDRAG_EMBEDDER") {
            config.embedding.provider = embedder;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(generator) = config_file.generator {
            result.generator = generator;
        }

        if let Some(rag) = config_file.rag {
            result.rag = rag;
        }

        if let Some(path) = config_file.knowledge_base.and_then(|kb| kb.path) {
            result.knowledge_base = Some(path);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        generator: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(generator) = generator {
            self.generator.provider = generator;
        }

        if let Some(model) = model {
            self.generator.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .medrag directory.
    pub fn medrag_dir(&self) -> PathBuf {
        self.workspace.join(".medrag")
    }

    /// Resolve the knowledge base file against the workspace.
    pub fn knowledge_base_path(&self) -> Option<PathBuf> {
        self.knowledge_base.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.workspace.join(path)
            }
        })
    }

    /// Validate provider names and numeric ranges.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_GENERATORS.contains(&self.generator.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown generator: {}. Supported: {}",
                self.generator.provider,
                KNOWN_GENERATORS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.embedding.max_retries > MAX_EMBEDDING_RETRIES {
            return Err(AppError::Config(format!(
                "embedding.maxRetries must be at most {}, got {}",
                MAX_EMBEDDING_RETRIES, self.embedding.max_retries
            )));
        }

        if self.rag.top_k == 0 {
            return Err(AppError::Config("rag.topK must be at least 1".to_string()));
        }

        if self.rag.max_tokens == 0 {
            return Err(AppError::Config(
                "rag.maxTokens must be at least 1".to_string(),
            ));
        }

        if let Some(min_score) = self.rag.min_score {
            if !(-1.0..=1.0).contains(&min_score) {
                return Err(AppError::Config(format!(
                    "rag.minScore must be within [-1, 1], got {}",
                    min_score
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.generator.provider, "ollama");
        assert_eq!(config.embedding.provider, "trigram");
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.rag.max_tokens, 100);
        assert!(config.generator.serialize);
        assert!(!config.verbose);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("extractive".to_string()),
            Some("mistral".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.generator.provider, "extractive");
        assert_eq!(overridden.generator.model, "mistral");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml_partial_sections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
rag:
  topK: 5
  minScore: 0.25
generator:
  provider: extractive
logging:
  color: false
knowledgeBase:
  path: notes.yaml
"#,
        )
        .unwrap();

        let mut base = AppConfig::default();
        base.workspace = temp.path().to_path_buf();
        let merged = base.merge_yaml(&path).unwrap();

        assert_eq!(merged.rag.top_k, 5);
        assert_eq!(merged.rag.min_score, Some(0.25));
        // Unspecified fields fall back to defaults
        assert_eq!(merged.rag.max_tokens, 100);
        assert_eq!(merged.generator.provider, "extractive");
        assert_eq!(merged.generator.model, "llama3.2");
        assert_eq!(merged.embedding, EmbeddingConfig::default());
        assert!(merged.no_color);
        assert_eq!(
            merged.knowledge_base_path(),
            Some(temp.path().join("notes.yaml"))
        );
    }

    #[test]
    fn test_merge_yaml_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "rag: [unterminated").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_generator() {
        let mut config = AppConfig::default();
        config.generator.provider = "gpt2".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.rag.top_k = 0;
        assert!(config.validate().is_err());

        config.rag.top_k = 3;
        config.rag.min_score = Some(1.5);
        assert!(config.validate().is_err());

        config.rag.min_score = None;
        config.embedding.max_retries = MAX_EMBEDDING_RETRIES;
        assert!(config.validate().is_ok());

        config.embedding.max_retries = u32::MAX;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
