//! Application state for the RAG server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::config::RagConfig;
use crate::pipeline::RagPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Fitted retrieval + generation pipeline
    pipeline: RagPipeline,
    /// Bounds concurrent generation calls
    generation_permits: Semaphore,
    /// Set once the generation provider answered a health check
    ready: RwLock<bool>,
}

impl AppState {
    /// Wrap an already-built pipeline
    pub fn new(config: RagConfig, pipeline: RagPipeline) -> Self {
        let permits = config.server.max_concurrent_generations.max(1);
        tracing::info!(
            "Server state initialized ({} chunks, {} concurrent generations)",
            pipeline.chunks().len(),
            permits
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                generation_permits: Semaphore::new(permits),
                ready: RwLock::new(false),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }

    /// Semaphore guarding the generation provider
    pub fn generation_permits(&self) -> &Semaphore {
        &self.inner.generation_permits
    }

    /// Per-request deadline, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.inner.config.server.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
