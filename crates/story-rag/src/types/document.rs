//! Document and chunk types with provenance tracking

use serde::{Deserialize, Serialize};

/// A source text loaded from the corpus directory
///
/// Only lives until it has been chunked; the index keeps chunks, not documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source identifier (file name, or relative path for nested corpora)
    pub source: String,
    /// Full UTF-8 text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// A bounded-length passage of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Source document identifier
    pub source: String,
    /// Zero-based position within the source document
    pub sequence: u32,
    /// Passage text
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(source: impl Into<String>, sequence: u32, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sequence,
            text: text.into(),
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
