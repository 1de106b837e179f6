//! Lexical retrieval: tokenization, TF-IDF indexing and top-k search

mod search;
mod tfidf;
mod tokenizer;

pub use search::{Retriever, ScoredChunk};
pub use tfidf::TfIdfIndex;
pub use tokenizer::tokenize;
