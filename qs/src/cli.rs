//! CLI argument parsing for qsplit

use clap::Parser;
use std::path::PathBuf;

/// Break long questions into multi-turn sub-questions
#[derive(Parser, Debug)]
#[command(name = "qsplit")]
#[command(author, version, about = "Break long questions into ordered multi-turn sub-questions", long_about = None)]
#[command(after_help = "Example:\n  qsplit input.json output.json")]
pub struct Cli {
    /// Input JSON file: an array of records with a `question` field
    pub input: PathBuf,

    /// Output JSON file for the annotated records
    pub output: PathBuf,

    /// OpenAI API key (overrides the environment)
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Model to use instead of the configured one
    #[arg(long)]
    pub model: Option<String>,
}
