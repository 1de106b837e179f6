//! Query request types

use serde::{Deserialize, Serialize};

/// Question posted to `/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve (server default when absent)
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Include retrieved chunks in the response (default: false)
    #[serde(default)]
    pub include_chunks: bool,
}

/// Retrieval-only request posted to `/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,

    /// Number of chunks to return (server default when absent)
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_body_deserializes() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"question": "Who was Kalidasa?"}"#).unwrap();
        assert_eq!(request.question, "Who was Kalidasa?");
        assert_eq!(request.top_k, None);
        assert!(!request.include_chunks);
    }
}
