//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document};
pub use query::{QueryRequest, SearchRequest};
pub use response::{QueryResponse, RetrievedChunk, SearchResponse};
