//! Story RAG server binary
//!
//! Run with: cargo run -p story-rag --bin story-rag-server

use story_rag::{config::RagConfig, pipeline::PipelineBuilder, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                      Story RAG System                     ║
║         Short-answer Q&A over a folder of stories         ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration ($STORY_RAG_CONFIG, then env overrides)
    let config = RagConfig::load(None)?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Corpus: {}", config.corpus.data_dir.display());
    tracing::info!("  - Chunk length: {}", config.chunking.max_length);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);

    // An empty corpus is fatal: the server does not start without an index
    let pipeline = PipelineBuilder::new(config.clone()).build()?;
    let server = RagServer::new(config.clone(), pipeline);

    // Check Ollama; /ready stays 503 while it is unreachable
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    if server.check_provider().await {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Answers will fail with 503 until it is reachable:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!("  2. Pull model: ollama pull {}", config.llm.generate_model);
    }

    println!("\nServer starting...");
    println!("  Chat UI: http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /query  - Ask a question");
    println!("  POST /search - Ranked chunks only");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
