//! Grounded answer composition over retrieved passages

use std::sync::Arc;

use super::prompt::PromptBuilder;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;

/// Turns retrieved passages and a question into a short answer
///
/// The provider handle is created once and shared across requests.
#[derive(Clone)]
pub struct AnswerComposer {
    llm: Arc<dyn LlmProvider>,
    prompts: PromptBuilder,
    max_output_length: usize,
}

impl AnswerComposer {
    /// Create a composer
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        prompts: PromptBuilder,
        max_output_length: usize,
    ) -> Self {
        Self {
            llm,
            prompts,
            max_output_length,
        }
    }

    /// The generation backend in use
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Answer `question` using only `passages` as context
    ///
    /// An empty passage list is valid and produces an empty context section.
    pub async fn compose<S: AsRef<str>>(&self, passages: &[S], question: &str) -> Result<String> {
        let prompt = self.prompts.build(passages, question);

        tracing::debug!(
            "Composing answer with {} passages via {} ({})",
            passages.len(),
            self.llm.name(),
            self.llm.model()
        );

        let output = self.llm.generate(&prompt, self.max_output_length).await?;
        extract_answer(&prompt, &output)
    }
}

/// Strip the echoed prompt from `output` and trim what remains
pub fn extract_answer(prompt: &str, output: &str) -> Result<String> {
    match output.strip_prefix(prompt) {
        Some(answer) => Ok(answer.trim().to_string()),
        None => Err(Error::contract_violation(format!(
            "output ({} bytes) does not begin with the {}-byte prompt",
            output.len(),
            prompt.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Echoes the prompt followed by a fixed reply, recording every prompt
    struct EchoLlm {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl EchoLlm {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn generate(&self, prompt: &str, _max_output_length: usize) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            Ok(format!("{}{}", prompt, self.reply))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    /// Returns text that does not start with the prompt
    struct AmnesiacLlm;

    #[async_trait]
    impl LlmProvider for AmnesiacLlm {
        async fn generate(&self, _prompt: &str, _max_output_length: usize) -> Result<String> {
            Ok("Paris.".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "amnesiac"
        }

        fn model(&self) -> &str {
            "none"
        }
    }

    #[tokio::test]
    async fn test_empty_context_unknown_answer() {
        let llm = EchoLlm::new(" I don't know.");
        let composer = AnswerComposer::new(llm.clone(), PromptBuilder::default(), 80);

        let answer = composer
            .compose::<String>(&[], "unknown question")
            .await
            .unwrap();
        assert_eq!(answer, "I don't know.");

        let prompts = llm.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context:\n\n\nQuestion: unknown question\nAnswer: "));
    }

    #[tokio::test]
    async fn test_answer_is_trimmed() {
        let llm = EchoLlm::new("\n  The sky is blue.  \n");
        let composer = AnswerComposer::new(llm, PromptBuilder::default(), 80);
        let answer = composer
            .compose(
                &["The sky above us is a deep and vivid blue color."],
                "What color is the sky?",
            )
            .await
            .unwrap();
        assert_eq!(answer, "The sky is blue.");
    }

    #[tokio::test]
    async fn test_missing_prompt_echo_is_violation() {
        let composer = AnswerComposer::new(Arc::new(AmnesiacLlm), PromptBuilder::default(), 80);
        let err = composer.compose(&["ctx"], "capital?").await.unwrap_err();
        assert!(matches!(err, Error::GenerationContractViolation(_)));
    }

    #[test]
    fn test_extract_answer_edge_cases() {
        assert_eq!(extract_answer("P: ", "P: ").unwrap(), "");
        assert!(extract_answer("Prompt", "Pro").is_err());
        assert!(extract_answer("Prompt", "prompt answer").is_err());
    }
}
