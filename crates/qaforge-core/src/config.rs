//! Configuration loaded from TOML with environment variable overrides.
//!
//! API keys are never read from the config file; they come from the
//! provider's conventional environment variable only.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::format::OutputFormat;
use crate::pipeline::GeneratorConfig;

/// LLM provider backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Claude,
    OpenAi,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::OpenAi => "openai",
        }
    }

    /// Environment variable holding the provider's API key.
    #[must_use]
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Claude => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Known model variants, most capable default first.
    #[must_use]
    pub const fn model_variants(self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["gemini-2.5-flash", "gemini-2.5-pro", "gemini-1.5-flash"],
            Self::Claude => &[
                "claude-sonnet-4-20250514",
                "claude-3-5-haiku-20241022",
                "claude-3-7-sonnet-latest",
            ],
            Self::OpenAi => &["gpt-4o", "gpt-4o-mini", "o3-mini"],
        }
    }

    #[must_use]
    pub const fn default_model(self) -> &'static str {
        self.model_variants()[0]
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Gemini, Self::Claude, Self::OpenAi]
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "claude" | "anthropic" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAi),
            other => anyhow::bail!("unknown provider '{other}' (expected gemini, claude, openai)"),
        }
    }
}

fn default_provider() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_words_per_chunk() -> usize {
    500
}

fn default_questions_per_chunk() -> usize {
    5
}

fn default_num_exchanges() -> usize {
    1
}

fn default_format() -> String {
    "generic".into()
}

fn default_output_dir() -> String {
    "datasets".into()
}

fn default_max_tokens() -> u32 {
    4000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    /// Empty string means the provider's default model.
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_words_per_chunk")]
    pub words_per_chunk: usize,
    #[serde(default = "default_questions_per_chunk")]
    pub questions_per_chunk: usize,
    #[serde(default = "default_num_exchanges")]
    pub num_exchanges: usize,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub custom_prompt: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: String::new(),
            words_per_chunk: default_words_per_chunk(),
            questions_per_chunk: default_questions_per_chunk(),
            num_exchanges: default_num_exchanges(),
            format: default_format(),
            custom_prompt: String::new(),
            output_dir: default_output_dir(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("QAFORGE_PROVIDER") {
            if let Ok(kind) = v.parse() {
                self.provider = kind;
            } else {
                tracing::warn!("ignoring invalid QAFORGE_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("QAFORGE_MODEL") {
            self.model = v;
        }
        if let Ok(v) = std::env::var("QAFORGE_WORDS_PER_CHUNK")
            && let Ok(n) = v.parse::<usize>()
        {
            self.words_per_chunk = n;
        }
        if let Ok(v) = std::env::var("QAFORGE_QUESTIONS_PER_CHUNK")
            && let Ok(n) = v.parse::<usize>()
        {
            self.questions_per_chunk = n;
        }
        if let Ok(v) = std::env::var("QAFORGE_NUM_EXCHANGES")
            && let Ok(n) = v.parse::<usize>()
        {
            self.num_exchanges = n;
        }
        if let Ok(v) = std::env::var("QAFORGE_FORMAT") {
            self.format = v;
        }
        if let Ok(v) = std::env::var("QAFORGE_OUTPUT_DIR") {
            self.output_dir = v;
        }
        if let Ok(v) = std::env::var("QAFORGE_MAX_TOKENS")
            && let Ok(n) = v.parse::<u32>()
        {
            self.max_tokens = n;
        }
    }

    /// Reject configurations the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.words_per_chunk > 0, "words_per_chunk must be positive");
        anyhow::ensure!(
            self.questions_per_chunk > 0,
            "questions_per_chunk must be positive"
        );
        anyhow::ensure!(self.num_exchanges > 0, "num_exchanges must be positive");
        anyhow::ensure!(self.max_tokens > 0, "max_tokens must be positive");
        Ok(())
    }

    /// The configured model, or the provider default when unset.
    #[must_use]
    pub fn resolved_model(&self) -> &str {
        if self.model.trim().is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    /// Read the provider's API key from its environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is unset or empty.
    pub fn api_key(&self) -> anyhow::Result<String> {
        let var = self.provider.api_key_var();
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => anyhow::bail!("{var} is not set (required for provider '{}')", self.provider),
        }
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_name(&self.format)
    }

    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            words_per_chunk: self.words_per_chunk,
            questions_per_chunk: self.questions_per_chunk,
            num_exchanges: self.num_exchanges,
            format: self.output_format(),
            custom_prompt: self.custom_prompt.clone(),
        }
    }
}
