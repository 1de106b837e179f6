//! Response types for RAG queries

use serde::{Deserialize, Serialize};

use crate::retrieval::ScoredChunk;

/// A retrieved passage as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Source document
    pub source: String,
    /// Position within the source document
    pub sequence: u32,
    /// Passage text
    pub text: String,
    /// Cosine similarity to the question
    pub score: f32,
}

impl From<&ScoredChunk> for RetrievedChunk {
    fn from(scored: &ScoredChunk) -> Self {
        Self {
            source: scored.chunk.source.clone(),
            sequence: scored.chunk.sequence,
            text: scored.chunk.text.clone(),
            score: scored.score,
        }
    }
}

/// Response from a RAG query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer with the prompt stripped
    pub answer: String,
    /// Retrieved context, only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<RetrievedChunk>>,
}

impl QueryResponse {
    /// Create a response carrying only the answer
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            chunks: None,
        }
    }

    /// Attach the retrieved context
    pub fn with_chunks(mut self, chunks: &[ScoredChunk]) -> Self {
        self.chunks = Some(chunks.iter().map(RetrievedChunk::from).collect());
        self
    }
}

/// Ranked chunks for a retrieval-only request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Best matches first
    pub chunks: Vec<RetrievedChunk>,
}

impl SearchResponse {
    /// Convert retriever output
    pub fn from_scored(chunks: &[ScoredChunk]) -> Self {
        Self {
            chunks: chunks.iter().map(RetrievedChunk::from).collect(),
        }
    }
}
