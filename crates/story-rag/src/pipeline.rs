//! One-time pipeline construction and the per-query entry points

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{AnswerComposer, PromptBuilder};
use crate::ingestion::{CorpusLoader, TextChunker};
use crate::providers::{LlmProvider, OllamaLlm};
use crate::retrieval::{Retriever, ScoredChunk};
use crate::types::{Chunk, Document};

/// Loads the corpus, chunks it, fits the index and wires up generation
pub struct PipelineBuilder {
    config: RagConfig,
}

impl PipelineBuilder {
    /// Create a builder; the configuration is validated on build
    pub fn new(config: RagConfig) -> Self {
        Self { config }
    }

    /// Configuration the pipeline will be built with
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Read every corpus document in discovery order
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        CorpusLoader::new(self.config.corpus.clone()).load()
    }

    /// Chunk `documents` and fit the index over the result
    pub fn build_retriever(&self, documents: &[Document]) -> Result<Retriever> {
        let chunker = TextChunker::from_config(&self.config.chunking)?;
        let chunks = chunker.chunk_documents(documents);
        tracing::info!(
            "Chunked {} documents into {} chunks (max {} chars)",
            documents.len(),
            chunks.len(),
            chunker.max_length()
        );
        Retriever::fit(chunks)
    }

    /// Build with the configured Ollama provider
    pub fn build(self) -> Result<RagPipeline> {
        let llm = OllamaLlm::new(&self.config.llm)?;
        tracing::info!(
            "Generation provider: ollama ({}) at {}",
            self.config.llm.generate_model,
            self.config.llm.base_url
        );
        self.build_with_llm(Arc::new(llm))
    }

    /// Build over the corpus directory with a caller-supplied provider
    pub fn build_with_llm(self, llm: Arc<dyn LlmProvider>) -> Result<RagPipeline> {
        self.config.validate()?;
        let documents = self.load_documents()?;
        self.build_from_documents(&documents, llm)
    }

    /// Build over in-memory documents
    pub fn build_from_documents(
        self,
        documents: &[Document],
        llm: Arc<dyn LlmProvider>,
    ) -> Result<RagPipeline> {
        let start = Instant::now();
        self.config.validate()?;

        let retriever = self.build_retriever(documents)?;
        let composer = AnswerComposer::new(
            llm,
            PromptBuilder::from_config(&self.config.prompt),
            self.config.llm.max_output_tokens,
        );

        tracing::info!(
            "Pipeline ready: {} chunks, {} terms in {:?}",
            retriever.len(),
            retriever.vocabulary_size(),
            start.elapsed()
        );

        Ok(RagPipeline {
            retriever,
            composer,
            top_k: self.config.retrieval.top_k,
        })
    }
}

/// Answer produced for one question
#[derive(Debug, Clone)]
pub struct Answer {
    /// Generated answer text
    pub text: String,
    /// Passages the answer was grounded on, best first
    pub chunks: Vec<ScoredChunk>,
}

/// Immutable, shareable pipeline state
#[derive(Clone)]
pub struct RagPipeline {
    retriever: Retriever,
    composer: AnswerComposer,
    top_k: usize,
}

impl RagPipeline {
    /// Default number of passages per question
    pub fn default_top_k(&self) -> usize {
        self.top_k
    }

    /// Every indexed chunk, in index order
    pub fn chunks(&self) -> &[Chunk] {
        self.retriever.chunks()
    }

    /// Number of distinct indexed terms
    pub fn vocabulary_size(&self) -> usize {
        self.retriever.vocabulary_size()
    }

    /// The generation backend
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        self.composer.llm()
    }

    /// Rank passages for `query` without generating
    pub fn retrieve(&self, query: &str, top_k: Option<usize>) -> Result<Vec<ScoredChunk>> {
        self.retriever.retrieve(query, top_k.unwrap_or(self.top_k))
    }

    /// Generate an answer for `question` grounded on already retrieved `chunks`
    pub async fn compose(&self, question: &str, chunks: &[ScoredChunk]) -> Result<String> {
        let passages: Vec<&str> = chunks.iter().map(|c| c.chunk.text.as_str()).collect();
        self.composer.compose(&passages, question).await
    }

    /// Retrieve then compose an answer for `question`
    pub async fn answer(&self, question: &str, top_k: Option<usize>) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_config("question must not be empty"));
        }

        let start = Instant::now();
        let chunks = self.retrieve(question, top_k)?;
        let text = self.compose(question, &chunks).await?;

        tracing::info!(
            "Answered \"{}\" from {} chunks in {:?}",
            question,
            chunks.len(),
            start.elapsed()
        );

        Ok(Answer { text, chunks })
    }
}
