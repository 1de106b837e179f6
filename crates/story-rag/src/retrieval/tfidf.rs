//! Sparse TF-IDF index with cosine scoring

use std::collections::{BTreeSet, HashMap};

use super::tokenizer::tokenize;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// L2-normalized sparse vector, entries sorted by term id
type SparseVector = Vec<(usize, f64)>;

/// Immutable TF-IDF model fitted over a fixed chunk list
///
/// Row `i` of the index corresponds to chunk `i` of the slice passed to [`TfIdfIndex::fit`].
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    /// Term -> column id, ids assigned in sorted term order
    vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per column
    idf: Vec<f64>,
    /// One normalized row per chunk
    vectors: Vec<SparseVector>,
}

impl TfIdfIndex {
    /// Fit the vocabulary and weights over `chunks`
    pub fn fit(chunks: &[Chunk]) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus("no chunks to index".to_string()));
        }

        let tokenized: Vec<Vec<String>> = chunks.iter().map(|c| tokenize(&c.text)).collect();

        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();
        if terms.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "{} chunks contain no indexable terms",
                chunks.len()
            )));
        }

        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(id, term)| (term.to_string(), id))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        let counts: Vec<HashMap<usize, usize>> = tokenized
            .iter()
            .map(|tokens| {
                let counts = term_counts(tokens, &vocabulary);
                for &id in counts.keys() {
                    document_frequency[id] += 1;
                }
                counts
            })
            .collect();

        let n = chunks.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .into_iter()
            .map(|counts| weigh(counts, &idf))
            .collect();

        tracing::info!(
            "Indexed {} chunks over {} terms",
            chunks.len(),
            vocabulary.len()
        );

        Ok(Self {
            vocabulary,
            idf,
            vectors,
        })
    }

    /// Cosine similarity of `query` against every indexed chunk, in index order
    ///
    /// A query sharing no terms with the vocabulary scores 0 everywhere.
    pub fn score(&self, query: &str) -> Vec<f32> {
        let counts = term_counts(&tokenize(query), &self.vocabulary);
        let query_vector: HashMap<usize, f64> = weigh(counts, &self.idf).into_iter().collect();

        if query_vector.is_empty() {
            return vec![0.0; self.vectors.len()];
        }

        self.vectors
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|(id, weight)| query_vector.get(id).map(|q| q * weight))
                    .sum::<f64>() as f32
            })
            .collect()
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no rows
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of distinct terms
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Raw counts of in-vocabulary terms
fn term_counts(tokens: &[String], vocabulary: &HashMap<String, usize>) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        if let Some(&id) = vocabulary.get(token) {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    counts
}

/// tf * idf, then L2 normalization
fn weigh(counts: HashMap<usize, usize>, idf: &[f64]) -> SparseVector {
    let mut vector: SparseVector = counts
        .into_iter()
        .map(|(id, tf)| (id, tf as f64 * idf[id]))
        .collect();
    vector.sort_unstable_by_key(|(id, _)| *id);

    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
    }
    vector
}
