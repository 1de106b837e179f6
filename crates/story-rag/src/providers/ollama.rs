//! Ollama-based LLM provider
//!
//! Wraps `OllamaClient` to implement the provider trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::OllamaClient;

use super::llm::LlmProvider;

/// Ollama LLM provider for answer generation
///
/// Ollama returns only the continuation, so the prompt is prepended to match
/// the prompt-echo shape `LlmProvider::generate` promises.
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = OllamaClient::new(config)?;
        Ok(Self::from_client(Arc::new(client)))
    }

    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        let model = client.model().to_string();
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str, max_output_length: usize) -> Result<String> {
        let continuation = self.client.complete(prompt, max_output_length).await?;
        Ok(format!("{}{}", prompt, continuation))
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::generation::{AnswerComposer, PromptBuilder};
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What the fake `/api/generate` endpoint replies with
    #[derive(Clone, Copy)]
    enum Reply {
        Continuation(&'static str),
        ServerError,
        Garbage,
    }

    #[derive(Clone)]
    struct FakeOllama {
        reply: Reply,
        hits: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    async fn generate_handler(
        State(fake): State<FakeOllama>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, String) {
        fake.hits.fetch_add(1, Ordering::SeqCst);
        fake.requests.lock().push(body);
        match fake.reply {
            Reply::Continuation(text) => (
                StatusCode::OK,
                serde_json::json!({ "response": text, "done": true }).to_string(),
            ),
            Reply::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed".into()),
            Reply::Garbage => (StatusCode::OK, "{\"respon".into()),
        }
    }

    /// Serve a fake Ollama on an ephemeral port and point a provider at it
    async fn spawn_fake(reply: Reply, max_retries: u32) -> (OllamaLlm, FakeOllama) {
        let fake = FakeOllama {
            reply,
            hits: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/api/generate", post(generate_handler))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = LlmConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 5,
            max_retries,
            ..LlmConfig::default()
        };
        (OllamaLlm::new(&config).unwrap(), fake)
    }

    #[tokio::test]
    async fn test_continuation_is_prefixed_with_prompt() {
        let (llm, fake) = spawn_fake(Reply::Continuation(" blue"), 0).await;
        let prompt = "Question: What color is the sky?\nAnswer:";

        let output = llm.generate(prompt, 80).await.unwrap();
        assert_eq!(output, format!("{} blue", prompt));

        let requests = fake.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["prompt"], prompt);
        assert_eq!(requests[0]["raw"], true);
        assert_eq!(requests[0]["stream"], false);
        assert_eq!(requests[0]["options"]["num_predict"], 80);
    }

    #[tokio::test]
    async fn test_composer_extracts_continuation() {
        let (llm, _fake) = spawn_fake(Reply::Continuation(" blue\n"), 0).await;
        let composer = AnswerComposer::new(Arc::new(llm), PromptBuilder::default(), 80);

        let answer = composer
            .compose(
                &["The sky above us is a deep and vivid blue color."],
                "What color is the sky?",
            )
            .await
            .unwrap();
        assert_eq!(answer, "blue");
    }

    #[tokio::test]
    async fn test_server_error_is_llm_error() {
        let (llm, fake) = spawn_fake(Reply::ServerError, 0).await;

        let err = llm.generate("prompt", 80).await.unwrap_err();
        match err {
            Error::Llm(message) => assert!(message.contains("500")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fake.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_is_llm_error() {
        let (llm, _fake) = spawn_fake(Reply::Garbage, 0).await;

        let err = llm.generate("prompt", 80).await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[tokio::test]
    async fn test_failed_request_is_retried() {
        let (llm, fake) = spawn_fake(Reply::ServerError, 1).await;

        assert!(llm.generate("prompt", 80).await.is_err());
        assert_eq!(fake.hits.load(Ordering::SeqCst), 2);
    }
}
