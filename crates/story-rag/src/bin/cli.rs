//! Story RAG command line
//!
//! Run with: cargo run -p story-rag --bin story-rag -- ask

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use story_rag::{
    config::RagConfig,
    ingestion::TextChunker,
    pipeline::PipelineBuilder,
    repl::{run_repl, ReplOptions},
};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about = "Ask questions about a folder of short stories")]
struct Cli {
    /// TOML configuration file (falls back to $STORY_RAG_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Passages retrieved per question
    #[arg(long, global = true)]
    top_k: Option<usize>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Interactive question loop
    Ask {
        /// Print the retrieved chunks before each answer
        #[arg(long, default_value_t = false)]
        show_chunks: bool,
    },
    /// Print every chunk of the corpus
    Chunks,
    /// Rank chunks for a query without generating an answer
    Search {
        /// Free-text query
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with answers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = RagConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.corpus.data_dir = dir;
    }
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate()?;

    let builder = PipelineBuilder::new(config);

    match cli.cmd {
        Cmd::Ask { show_chunks } => {
            let pipeline = builder.build()?;
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            run_repl(
                &pipeline,
                stdin,
                &mut stdout,
                ReplOptions {
                    show_chunks,
                    top_k: None,
                },
            )
            .await?;
        }
        Cmd::Chunks => {
            let documents = builder.load_documents()?;
            let chunker = TextChunker::from_config(&builder.config().chunking)?;
            for chunk in chunker.chunk_documents(&documents) {
                println!("--- {} (chunk {}) ---", chunk.source, chunk.sequence);
                println!("{}", chunk.text);
                println!();
            }
        }
        Cmd::Search { query } => {
            let documents = builder.load_documents()?;
            let retriever = builder.build_retriever(&documents)?;
            let top_k = builder.config().retrieval.top_k;
            for scored in retriever.retrieve(&query, top_k)? {
                println!(
                    "{:.4}\t{} (chunk {})\t{}",
                    scored.score, scored.chunk.source, scored.chunk.sequence, scored.chunk.text
                );
            }
        }
    }

    Ok(())
}
