//! Top-k passage retrieval over a fitted index

use std::sync::Arc;

use super::tfidf::TfIdfIndex;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// A chunk paired with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (0.0-1.0, higher is better)
    pub score: f32,
}

/// Ranks indexed chunks against a query
///
/// Cheap to clone; the index and chunk list are shared and never mutated.
#[derive(Debug, Clone)]
pub struct Retriever {
    index: Arc<TfIdfIndex>,
    chunks: Arc<[Chunk]>,
}

impl Retriever {
    /// Pair an index with the chunk list it was fitted on
    pub fn new(index: TfIdfIndex, chunks: Vec<Chunk>) -> Result<Self> {
        if index.len() != chunks.len() {
            return Err(Error::invalid_config(format!(
                "index has {} rows but {} chunks were supplied",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            index: Arc::new(index),
            chunks: chunks.into(),
        })
    }

    /// Fit a fresh index over `chunks`
    pub fn fit(chunks: Vec<Chunk>) -> Result<Self> {
        let index = TfIdfIndex::fit(&chunks)?;
        Self::new(index, chunks)
    }

    /// Return the `min(top_k, N)` best chunks, highest score first
    ///
    /// Equal scores keep index order.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        if top_k == 0 {
            return Err(Error::invalid_config("top_k must be positive"));
        }

        let scores = self.index.score(query);
        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        // stable: ties stay in index order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_k);

        let results: Vec<ScoredChunk> = ranked
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: self.chunks[i].clone(),
                score,
            })
            .collect();

        tracing::debug!(
            "Retrieved {} chunks (best score {:.3})",
            results.len(),
            results.first().map(|r| r.score).unwrap_or(0.0)
        );

        Ok(results)
    }

    /// All indexed chunks, in index order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of distinct indexed terms
    pub fn vocabulary_size(&self) -> usize {
        self.index.vocabulary_size()
    }
}
