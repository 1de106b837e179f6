//! Prompt templates for story question answering

use crate::config::{PromptConfig, PromptStyle};

/// Prompt builder for RAG queries
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    style: PromptStyle,
    domain: String,
    language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::from_config(&PromptConfig::default())
    }
}

impl PromptBuilder {
    /// Build from configuration
    pub fn from_config(config: &PromptConfig) -> Self {
        Self {
            style: config.style,
            domain: config.domain.clone(),
            language: config.language.clone(),
        }
    }

    /// Join passage texts into the context block, one per line
    pub fn build_context<S: AsRef<str>>(passages: &[S]) -> String {
        passages
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the full prompt for `question` over `passages`
    pub fn build<S: AsRef<str>>(&self, passages: &[S], question: &str) -> String {
        let context = Self::build_context(passages);
        match self.style {
            PromptStyle::Concise => self.build_concise_prompt(&context, question),
            PromptStyle::Bare => Self::build_bare_prompt(&context, question),
        }
    }

    /// Short-answer template with an explicit "don't know" instruction
    pub fn build_concise_prompt(&self, context: &str, question: &str) -> String {
        format!(
            "You are a concise assistant for {domain} stories.\n\
             Answer in simple {language} in 1-2 lines using ONLY the context.\n\
             If the answer is not in the context, say you don't know.\n\
             \n\
             Context:\n\
             {context}\n\
             \n\
             Question: {question}\n\
             Answer: ",
            domain = self.domain,
            language = self.language,
            context = context,
            question = question
        )
    }

    /// Minimal template without instructions
    pub fn build_bare_prompt(context: &str, question: &str) -> String {
        format!(
            "Answer this question based on the following context:\n\
             {context}\n\
             Question: {question}\n\
             Answer:",
            context = context,
            question = question
        )
    }
}
