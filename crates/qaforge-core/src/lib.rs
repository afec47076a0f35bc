//! Core dataset-generation pipeline: chunking, prompt building, response
//! parsing, output formatting, and run orchestration.

pub mod chunker;
pub mod config;
pub mod document;
pub mod format;
pub mod parser;
pub mod pipeline;
pub mod prompt;

pub use chunker::Chunk;
pub use config::{Config, ProviderKind};
pub use document::{Document, DocumentError};
pub use format::OutputFormat;
pub use parser::{Conversation, Exchange};
pub use pipeline::{DatasetGenerator, GenerationRun, GeneratorConfig};
