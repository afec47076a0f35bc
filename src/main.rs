use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use qaforge_core::config::{Config, ProviderKind};
use qaforge_core::document::load_document;
use qaforge_core::pipeline::DatasetGenerator;
use qaforge_llm::any::AnyProvider;
use qaforge_llm::claude::ClaudeProvider;
use qaforge_llm::gemini::GeminiProvider;
use qaforge_llm::openai::OpenAiProvider;

/// Turn documents into instruction-tuning datasets.
#[derive(Debug, Parser)]
#[command(name = "qaforge", version, about)]
struct Cli {
    /// Input document (.txt, .md, .markdown or .pdf).
    #[arg(required_unless_present = "list_models")]
    input: Option<PathBuf>,

    /// Config file path.
    #[arg(long, default_value = "qaforge.toml")]
    config: PathBuf,

    /// LLM provider (gemini, claude, openai).
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model name; defaults to the provider's first-choice model.
    #[arg(long)]
    model: Option<String>,

    /// Output schema (gemma, llama, chatml, messages, alpaca, generic).
    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    words_per_chunk: Option<usize>,

    #[arg(long)]
    questions_per_chunk: Option<usize>,

    /// Question/answer rounds per conversation.
    #[arg(long)]
    num_exchanges: Option<usize>,

    /// File with custom prompt instructions.
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print known models per provider and exit.
    #[arg(long)]
    list_models: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(ref format) = self.format {
            config.format = format.clone();
        }
        if let Some(n) = self.words_per_chunk {
            config.words_per_chunk = n;
        }
        if let Some(n) = self.questions_per_chunk {
            config.questions_per_chunk = n;
        }
        if let Some(n) = self.num_exchanges {
            config.num_exchanges = n;
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir = dir.display().to_string();
        }
        if let Some(ref path) = self.prompt_file {
            config.custom_prompt = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read prompt file {}", path.display()))?;
        }
        Ok(())
    }
}

fn list_models() {
    for &provider in ProviderKind::all() {
        println!("{provider}:");
        for variant in provider.model_variants() {
            println!("  {variant}");
        }
    }
}

fn build_provider(config: &Config, api_key: String) -> AnyProvider {
    let model = config.resolved_model().to_owned();
    match config.provider {
        ProviderKind::Gemini => AnyProvider::Gemini(GeminiProvider::new(api_key, model)),
        ProviderKind::Claude => {
            AnyProvider::Claude(ClaudeProvider::new(api_key, model, config.max_tokens))
        }
        ProviderKind::OpenAi => {
            AnyProvider::OpenAi(OpenAiProvider::new(api_key, model, config.max_tokens))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    if cli.list_models {
        list_models();
        return Ok(());
    }

    let mut config = Config::load(&cli.config)?;
    cli.apply_to(&mut config)?;
    config.validate()?;

    let api_key = config.api_key()?;
    let provider = build_provider(&config, api_key);

    let input = cli.input.as_deref().context("input path is required")?;
    let document = load_document(input)
        .await
        .with_context(|| format!("failed to load {}", input.display()))?;
    info!(
        source = %document.source,
        content_type = %document.content_type,
        bytes = document.content.len(),
        "document loaded"
    );

    let format = config.output_format();
    let generator = DatasetGenerator::new(provider, config.generator_config());
    let run = generator.run(&document.content).await;

    anyhow::ensure!(
        !run.examples.is_empty(),
        "no training examples generated ({} of {} chunks succeeded)",
        run.chunks_succeeded,
        run.chunks_total
    );

    let output_dir = PathBuf::from(&config.output_dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let output_path = output_dir.join(format!("dataset_{format}_{timestamp}.jsonl"));
    let mut jsonl = run.examples.join("\n");
    jsonl.push('\n');
    std::fs::write(&output_path, jsonl)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!(
        path = %output_path.display(),
        examples = run.examples.len(),
        chunks_succeeded = run.chunks_succeeded,
        chunks_total = run.chunks_total,
        "dataset written"
    );
    println!(
        "Wrote {} examples to {} ({}/{} chunks succeeded)",
        run.examples.len(),
        output_path.display(),
        run.chunks_succeeded,
        run.chunks_total
    );

    Ok(())
}
