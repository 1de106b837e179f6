//! Pluggable generation backends

pub mod llm;
pub mod ollama;

pub use llm::LlmProvider;
pub use ollama::OllamaLlm;
