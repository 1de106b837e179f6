//! Answer generation: prompt templates, composition and the Ollama client

pub mod composer;
pub mod ollama;
pub mod prompt;

pub use composer::{extract_answer, AnswerComposer};
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
