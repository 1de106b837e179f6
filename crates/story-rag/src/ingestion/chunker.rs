//! Paragraph-window chunking with per-document sequence numbers

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Default noise floor: windows this short or shorter are dropped
pub const DEFAULT_MIN_LENGTH: usize = 30;

/// Splits documents into fixed-size, non-overlapping character windows
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Window size in characters
    max_length: usize,
    /// Windows must be strictly longer than this
    min_length: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(max_length: usize) -> Result<Self> {
        Self::with_min_length(max_length, DEFAULT_MIN_LENGTH)
    }

    /// Create a chunker with a custom noise floor
    pub fn with_min_length(max_length: usize, min_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(Error::invalid_config("chunk max_length must be positive"));
        }
        Ok(Self {
            max_length,
            min_length,
        })
    }

    /// Build from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::with_min_length(config.max_length, config.min_length)
    }

    /// Window size in characters
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Chunk a sequence of documents, preserving document order
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunk_document(doc))
            .collect()
    }

    /// Chunk a single document; sequence numbers start at 0
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut sequence = 0u32;

        for paragraph in doc.text.split('\n') {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            for window in char_windows(paragraph, self.max_length) {
                if window.chars().count() <= self.min_length {
                    continue;
                }
                chunks.push(Chunk::new(doc.source.as_str(), sequence, window));
                sequence += 1;
            }
        }

        tracing::debug!("{}: {} chunks", doc.source, chunks.len());
        chunks
    }
}

/// Convenience wrapper: `chunk(documents, max_length)`
pub fn chunk(documents: &[Document], max_length: usize) -> Result<Vec<Chunk>> {
    Ok(TextChunker::new(max_length)?.chunk_documents(documents))
}

/// Split `text` into consecutive slices of at most `size` characters
fn char_windows(text: &str, size: usize) -> Vec<&str> {
    let starts: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .step_by(size)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}
