//! HTTP server for the RAG system

pub mod routes;
pub mod state;

use axum::{response::Html, routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::pipeline::RagPipeline;
use state::AppState;

/// Embedded single-page chat UI
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server around a built pipeline
    pub fn new(config: RagConfig, pipeline: RagPipeline) -> Self {
        let state = AppState::new(config.clone(), pipeline);
        Self { config, state }
    }

    /// Health-check the generation provider and record the result as readiness
    ///
    /// The server serves either way; `/ready` reports 503 until a check succeeds.
    pub async fn check_provider(&self) -> bool {
        let llm = self.state.pipeline().llm();
        let healthy = match llm.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Health check for {} failed: {}", llm.name(), e);
                false
            }
        };
        self.state.set_ready(healthy);
        healthy
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/", get(index))
            // Health check
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .merge(routes::query_routes())
            .nest("/api", routes::api_routes())
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting story RAG server on http://{}", addr);
        tracing::info!("API info: http://{}/api/info", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Chat UI
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}
