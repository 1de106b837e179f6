//! Configuration for the RAG system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_ENV: &str = "STORY_RAG_CONFIG";

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Corpus discovery configuration
    pub corpus: CorpusConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Prompt template configuration
    pub prompt: PromptConfig,
}

impl RagConfig {
    /// Parse a TOML config file; missing sections fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load from an explicit path, `$STORY_RAG_CONFIG`, or defaults, then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var(CONFIG_PATH_ENV) {
                Ok(path) => Self::from_file(path)?,
                Err(_) => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `STORY_RAG_*` overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("STORY_RAG_DATA_DIR") {
            self.corpus.data_dir = PathBuf::from(dir);
        }
        if let Ok(port) = std::env::var("STORY_RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("STORY_RAG_PORT is not a port: {}", port)))?;
        }
        if let Ok(url) = std::env::var("STORY_RAG_LLM_URL") {
            self.llm.base_url = url;
        }
        Ok(())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_length == 0 {
            return Err(Error::invalid_config("chunking.max_length must be positive"));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::invalid_config("retrieval.top_k must be positive"));
        }
        if self.server.max_concurrent_generations == 0 {
            return Err(Error::invalid_config(
                "server.max_concurrent_generations must be positive",
            ));
        }
        if self.corpus.extensions.is_empty() {
            return Err(Error::invalid_config("corpus.extensions must not be empty"));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Upper bound on generation calls in flight
    pub max_concurrent_generations: usize,
    /// Per-request deadline in seconds (0 disables it)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_concurrent_generations: 4,
            request_timeout_secs: 120,
        }
    }
}

/// What to do with a corpus file that cannot be decoded
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Log and continue with the remaining files
    #[default]
    Skip,
    /// Fail the whole load
    Abort,
}

/// Corpus discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding the text files
    pub data_dir: PathBuf,
    /// Recognized file extensions (without the dot)
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Policy for undecodable files
    pub on_read_error: ReadErrorPolicy,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extensions: vec!["txt".to_string()],
            recursive: false,
            on_read_error: ReadErrorPolicy::Skip,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub max_length: usize,
    /// Windows of this many characters or fewer are dropped
    pub min_length: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_length: 300,
            min_length: 30,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Passages handed to the composer per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation (0 = greedy)
    pub temperature: f32,
    /// Cap on generated tokens after the prompt
    pub max_output_tokens: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            generate_model: "llama3.2:1b".to_string(),
            temperature: 0.0,
            max_output_tokens: 80,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Which prompt template to use
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// "You are a concise assistant for ..." template
    #[default]
    Concise,
    /// "Answer this question based on the following context" template
    Bare,
}

/// Prompt template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Story domain named in the instruction block
    pub domain: String,
    /// Answer language named in the instruction block
    pub language: String,
    /// Template variant
    pub style: PromptStyle,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            domain: "Sanskrit".to_string(),
            language: "Hindi or English".to_string(),
            style: PromptStyle::Concise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.max_length, 300);
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml_str(
            r#"
            [chunking]
            max_length = 120

            [corpus]
            on_read_error = "abort"

            [prompt]
            style = "bare"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.max_length, 120);
        assert_eq!(config.chunking.min_length, 30);
        assert_eq!(config.corpus.on_read_error, ReadErrorPolicy::Abort);
        assert_eq!(config.prompt.style, PromptStyle::Bare);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = RagConfig::default();
        config.chunking.max_length = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = RagConfig::default();
        config.retrieval.top_k = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = RagConfig::from_toml_str("[chunking]\nmax_length = \"big\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
