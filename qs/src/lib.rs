//! Question Splitter - multi-turn decomposition of long questions
//!
//! Breaks a long natural-language question into an ordered sequence of short,
//! dependent questions, and annotates datasets of question records with the
//! result. The semantic judgment is delegated to an LLM oracle; this crate
//! builds its instructions, recovers a question list from its reply, and falls
//! back to the original question whenever that reply is unusable.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`oracle`] - Single instruction/response exchange with the model
//! - [`prompts`] - Instruction templates
//! - [`splitter`] - Decomposition engine: extraction, validation, fallback
//! - [`dataset`] - Record annotation and file I/O
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod dataset;
pub mod llm;
pub mod oracle;
pub mod prompts;
pub mod splitter;

pub use config::{Config, LlmConfig, SplitterConfig};
pub use dataset::{Annotation, DatasetAnnotator, Progress, RunSummary};
pub use llm::{LlmClient, LlmError, OpenAIClient, create_client};
pub use oracle::{LlmOracle, Oracle};
pub use prompts::PromptLoader;
pub use splitter::{Extraction, QuestionSplitter, SplitOutcome, ValidationError};

/// Marker the oracle may emit to decline a split
pub const NO_SPLIT_TOKEN: &str = "NO_SPLIT";
