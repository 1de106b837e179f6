//! Error types for the RAG system

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to clients when the answer could not be produced
pub const UNAVAILABLE_MESSAGE: &str =
    "The answer service is temporarily unavailable. Please try again later.";

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter is out of range (chunk size, top_k, mismatched index)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Nothing could be indexed
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// A corpus file could not be read or decoded
    #[error("Failed to read corpus file '{source_id}': {message}")]
    CorpusRead { source_id: String, message: String },

    /// The generation capability did not echo the prompt
    #[error("Generation contract violated: {0}")]
    GenerationContractViolation(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ollama/LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Request exceeded its deadline
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request body could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a corpus read error
    pub fn corpus_read(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorpusRead {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create a generation contract violation
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::GenerationContractViolation(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::InvalidConfiguration(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_configuration", msg.clone())
            }
            Error::EmptyCorpus(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "empty_corpus", msg.clone())
            }
            Error::CorpusRead { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "corpus_read_error",
                self.to_string(),
            ),
            // Raw model output is never echoed back to the client
            Error::GenerationContractViolation(_) | Error::Llm(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "generation_unavailable",
                UNAVAILABLE_MESSAGE.to_string(),
            ),
            Error::Timeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                UNAVAILABLE_MESSAGE.to_string(),
            ),
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            Error::Http(_) => (
                StatusCode::BAD_GATEWAY,
                "http_error",
                UNAVAILABLE_MESSAGE.to_string(),
            ),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
