//! Corpus ingestion: directory loading and chunking

mod chunker;
mod loader;

pub use chunker::{chunk, TextChunker, DEFAULT_MIN_LENGTH};
pub use loader::CorpusLoader;
