//! Question answering and retrieval-only endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::future::Future;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse, SearchRequest, SearchResponse};

/// POST /query - Retrieve context and generate an answer
pub async fn query_rag(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = payload?;
    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::invalid_config("question must not be empty"));
    }

    tracing::info!("Query: \"{}\"", question);

    let answer = with_deadline(&state, async {
        let _permit = state
            .generation_permits()
            .acquire()
            .await
            .map_err(|_| Error::internal("generation limiter closed"))?;
        state.pipeline().answer(question, request.top_k).await
    })
    .await?;

    let mut response = QueryResponse::new(answer.text);
    if request.include_chunks {
        response = response.with_chunks(&answer.chunks);
    }

    Ok(Json(response))
}

/// POST /search - Ranked chunks without generation
pub async fn search(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>> {
    let Json(request) = payload?;
    let query = request.query.trim();
    if query.is_empty() {
        return Err(Error::invalid_config("query must not be empty"));
    }

    let results = state.pipeline().retrieve(query, request.top_k)?;
    tracing::info!("Search: \"{}\" -> {} chunks", query, results.len());

    Ok(Json(SearchResponse::from_scored(&results)))
}

/// Apply the configured per-request timeout
async fn with_deadline<T>(state: &AppState, work: impl Future<Output = Result<T>>) -> Result<T> {
    match state.request_timeout() {
        Some(deadline) => tokio::time::timeout(deadline, work)
            .await
            .map_err(|_| Error::Timeout(deadline.as_secs()))?,
        None => work.await,
    }
}
