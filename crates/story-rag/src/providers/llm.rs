//! LLM provider trait for text generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt-continuation text generation
///
/// `generate` must return the prompt followed by the continuation, the same
/// shape a raw text-generation pipeline produces. Callers strip the prompt
/// themselves and treat a missing prefix as a contract violation.
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (llama3.2, phi3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Continue `prompt` with at most `max_output_length` new tokens
    async fn generate(&self, prompt: &str, max_output_length: usize) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
