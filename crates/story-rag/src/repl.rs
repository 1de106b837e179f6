//! Line-oriented question loop used by the `story-rag ask` command

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, UNAVAILABLE_MESSAGE};
use crate::pipeline::RagPipeline;
use crate::retrieval::ScoredChunk;

const BANNER: &str = "Welcome to the story RAG CLI. Type your question (or 'exit' to quit):\n\n";
const PROMPT: &str = "Enter question (or 'exit'): ";
const SEPARATOR: &str = "========================================";

/// Loop behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplOptions {
    /// Print the retrieved chunks before each answer
    pub show_chunks: bool,
    /// Override the pipeline's default top_k
    pub top_k: Option<usize>,
}

/// Whether `line` ends the loop (`exit`, any case, surrounding whitespace ignored)
pub fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Read questions from `input` and write answers to `output` until `exit` or EOF
///
/// A failed answer is reported as unavailable and the loop continues.
pub async fn run_repl<R, W>(
    pipeline: &RagPipeline,
    input: R,
    output: &mut W,
    options: ReplOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(BANNER.as_bytes()).await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };
        if is_exit_command(&line) {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        // Chunks are shown before generation so they survive a failed answer
        let answer = match pipeline.retrieve(question, options.top_k) {
            Ok(chunks) => {
                if options.show_chunks {
                    write_chunks(output, &chunks).await?;
                }
                pipeline.compose(question, &chunks).await
            }
            Err(e) => Err(e),
        };

        let block = match answer {
            Ok(text) => format!("\nAnswer:\n{}\n\n{}\n", text, SEPARATOR),
            Err(e) => {
                tracing::warn!("Answer failed: {}", e);
                format!("\n{}\n\n{}\n", UNAVAILABLE_MESSAGE, SEPARATOR)
            }
        };
        output.write_all(block.as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}

async fn write_chunks<W>(output: &mut W, chunks: &[ScoredChunk]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(b"\nTop matches:\n").await?;
    for scored in chunks {
        let line = format!(
            "[{:.3}] {} (chunk {}): {}\n",
            scored.score, scored.chunk.source, scored.chunk.sequence, scored.chunk.text
        );
        output.write_all(line.as_bytes()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::error::Error;
    use crate::pipeline::PipelineBuilder;
    use crate::providers::LlmProvider;
    use crate::types::Document;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::BufReader;

    /// Answers "blue" the first time, then fails
    struct FlakyLlm {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmProvider for FlakyLlm {
        async fn generate(&self, prompt: &str, _max_output_length: usize) -> Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(format!("{}blue", prompt))
            } else {
                Err(Error::llm("connection refused"))
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "flaky"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn pipeline() -> RagPipeline {
        let docs = vec![Document::new(
            "nature.txt",
            "The sky above us is a deep and vivid blue color.\n\
             The grass in the field is a bright vivid green color.",
        )];
        PipelineBuilder::new(RagConfig::default())
            .build_from_documents(
                &docs,
                Arc::new(FlakyLlm {
                    calls: AtomicUsize::new(0),
                }),
            )
            .unwrap()
    }

    #[test]
    fn test_exit_command_variants() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("  EXIT \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(""));
    }

    #[tokio::test]
    async fn test_loop_answers_skips_blanks_and_survives_failure() {
        let pipeline = pipeline();
        let script = "What color is the sky?\n\n   \nAnd the grass?\nexit\nnever asked\n";
        let input = BufReader::new(script.as_bytes());
        let mut output = Vec::new();

        run_repl(&pipeline, input, &mut output, ReplOptions::default())
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Answer:\nblue\n"));
        assert!(text.contains(UNAVAILABLE_MESSAGE));
        assert!(!text.contains("never asked"));
        // one prompt per line read, up to and including exit
        assert_eq!(text.matches(PROMPT).count(), 5);
    }

    #[tokio::test]
    async fn test_eof_ends_loop_and_chunks_are_shown() {
        let pipeline = pipeline();
        let input = BufReader::new(&b"sky"[..]);
        let mut output = Vec::new();

        run_repl(
            &pipeline,
            input,
            &mut output,
            ReplOptions {
                show_chunks: true,
                top_k: Some(1),
            },
        )
        .await
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Top matches:\n["));
        assert!(text.contains("nature.txt (chunk 0)"));
        assert_eq!(text.matches("(chunk ").count(), 1);
    }

    #[tokio::test]
    async fn test_chunks_shown_when_generation_fails() {
        let pipeline = pipeline();
        let input = BufReader::new(&b"sky
grass
"[..]);
        let mut output = Vec::new();

        run_repl(
            &pipeline,
            input,
            &mut output,
            ReplOptions {
                show_chunks: true,
                top_k: Some(1),
            },
        )
        .await
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        // the second question's provider call fails after its chunks are printed
        let (_, second) = text.split_once("Answer:\nblue").unwrap();
        assert!(second.contains("Top matches:\n["));
        assert!(second.contains("green color."));
        assert!(second.contains(UNAVAILABLE_MESSAGE));
        assert_eq!(text.matches("Top matches:").count(), 2);
    }
}
