//! Run orchestration: chunk, prompt, generate, parse, serialize.
//!
//! Chunks are processed strictly in order and in isolation. A chunk that
//! exhausts its retry budget is skipped, never aborts the run; the run report
//! makes the loss visible instead.

use std::time::Duration;

use qaforge_llm::CompletionProvider;
use tracing::{debug, error, info, warn};

use crate::chunker::split_by_word_count;
use crate::format::{self, OutputFormat};
use crate::parser::{self, Conversation};
use crate::prompt;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(3);
const INTER_CHUNK_DELAY: Duration = Duration::from_secs(1);

/// Knobs for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub words_per_chunk: usize,
    pub questions_per_chunk: usize,
    pub num_exchanges: usize,
    pub format: OutputFormat,
    pub custom_prompt: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            words_per_chunk: 500,
            questions_per_chunk: 5,
            num_exchanges: 1,
            format: OutputFormat::default(),
            custom_prompt: String::new(),
        }
    }
}

/// Outcome of a full run over one document.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRun {
    /// One serialized JSON line per kept conversation, in chunk order.
    pub examples: Vec<String>,
    pub chunks_total: usize,
    pub chunks_succeeded: usize,
    pub conversations_requested: usize,
}

impl GenerationRun {
    /// Kept examples as a fraction of the conversations requested, in
    /// `0.0..=1.0`. This is the dataset yield: parse discards and skipped
    /// chunks both pull it down.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.conversations_requested == 0 {
            return 1.0;
        }
        self.examples.len() as f64 / self.conversations_requested as f64
    }

    /// Fraction of chunks that produced a completion, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn chunk_success_rate(&self) -> f64 {
        if self.chunks_total == 0 {
            return 1.0;
        }
        self.chunks_succeeded as f64 / self.chunks_total as f64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn examples_per_chunk(&self) -> f64 {
        if self.chunks_total == 0 {
            return 0.0;
        }
        self.examples.len() as f64 / self.chunks_total as f64
    }
}

/// Drives the chunk-by-chunk generation loop against one provider.
pub struct DatasetGenerator<P: CompletionProvider> {
    provider: P,
    config: GeneratorConfig,
}

impl<P: CompletionProvider> DatasetGenerator<P> {
    pub fn new(provider: P, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    /// Process `text` end to end and return the run report.
    pub async fn run(&self, text: &str) -> GenerationRun {
        let chunks = split_by_word_count(text, self.config.words_per_chunk);
        let chunks_total = chunks.len();
        info!(
            chunks = chunks_total,
            words_per_chunk = self.config.words_per_chunk,
            provider = self.provider.name(),
            format = %self.config.format,
            "starting generation run"
        );

        let mut examples = Vec::new();
        let mut chunks_succeeded = 0;

        for chunk in &chunks {
            if chunk.index > 0 {
                tokio::time::sleep(INTER_CHUNK_DELAY).await;
            }

            let request = prompt::build(
                &chunk.text,
                &self.config.custom_prompt,
                self.config.questions_per_chunk,
                self.config.num_exchanges,
            );

            match self.generate_conversations(&request, chunk.index).await {
                Some(conversations) => {
                    chunks_succeeded += 1;
                    debug!(
                        chunk = chunk.index,
                        conversations = conversations.len(),
                        "chunk parsed"
                    );
                    if conversations.len() < self.config.questions_per_chunk {
                        warn!(
                            chunk = chunk.index,
                            parsed = conversations.len(),
                            requested = self.config.questions_per_chunk,
                            "fewer conversations than requested"
                        );
                    }
                    for conversation in &conversations {
                        examples.push(format::emit(conversation, self.config.format));
                    }
                }
                None => {
                    error!(chunk = chunk.index, "chunk skipped after retries");
                }
            }
        }

        let run = GenerationRun {
            examples,
            chunks_total,
            chunks_succeeded,
            conversations_requested: chunks_total * self.config.questions_per_chunk,
        };
        info!(
            examples = run.examples.len(),
            chunks_succeeded = run.chunks_succeeded,
            chunks_total = run.chunks_total,
            "generation run finished"
        );
        run
    }

    /// One chunk's completion with retries. `None` means the retry budget is
    /// exhausted and the chunk should be skipped.
    async fn generate_conversations(&self, request: &str, chunk: usize) -> Option<Vec<Conversation>> {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.provider.generate(request).await {
                Ok(raw) => {
                    return Some(parser::parse(&raw, self.config.num_exchanges));
                }
                Err(err) if err.is_empty_response() => {
                    warn!(chunk, attempt, "empty completion, retrying");
                }
                Err(err) => {
                    error!(chunk, attempt, error = %err, "completion failed");
                }
            }
            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
        None
    }
}
