//! API routes for the RAG server

pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Query and search routes
pub fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query_rag))
        .route("/search", post(query::search))
}

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// API info endpoint
async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    let pipeline = state.pipeline();
    axum::Json(serde_json::json!({
        "name": "story-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "TF-IDF retrieval-augmented question answering over short stories",
        "corpus": {
            "chunks": pipeline.chunks().len(),
            "vocabulary": pipeline.vocabulary_size(),
        },
        "retrieval": {
            "default_top_k": pipeline.default_top_k(),
        },
        "llm": {
            "provider": pipeline.llm().name(),
            "model": pipeline.llm().model(),
        },
        "endpoints": {
            "POST /query": "Answer a question from retrieved context",
            "POST /search": "Ranked chunks without generation",
            "GET /health": "Liveness",
            "GET /ready": "Readiness",
            "GET /": "Chat UI"
        }
    }))
}
