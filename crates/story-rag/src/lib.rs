//! story-rag: retrieval-augmented question answering over short story collections
//!
//! Text files are split into bounded passages, indexed with TF-IDF, and the
//! best-matching passages are handed to a local LLM as grounding context for
//! a short answer. The crate ships an HTTP server with a small chat UI and an
//! interactive command line on top of the same pipeline.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod repl;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::{Answer, PipelineBuilder, RagPipeline};
pub use types::{
    document::{Chunk, Document},
    query::QueryRequest,
    response::QueryResponse,
};
