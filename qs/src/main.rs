//! qsplit - annotate a question dataset with multi-turn decompositions
//!
//! CLI entry point: loads credentials and configuration, then runs the
//! dataset annotator over one input file.

use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use question_splitter::cli::Cli;
use question_splitter::config::Config;
use question_splitter::{DatasetAnnotator, LlmOracle, PromptLoader, QuestionSplitter, create_client};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") | None => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", other);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn print_missing_key(env_name: &str) {
    eprintln!("{} An OpenAI API key is required.", "✗".red());
    eprintln!("  Supply it in one of these ways:");
    eprintln!("    1. Pass it inline:        qsplit <INPUT> <OUTPUT> --api-key <KEY>");
    eprintln!("    2. Export it:             export {}='your-api-key'", env_name);
    eprintln!("    3. Add it to a .env file: {}=your-api-key", env_name);
}

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env may provide the credential; absence is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    debug!(?dotenv, "main: .env lookup");

    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    let Some(api_key) = config.resolve_api_key(cli.api_key.as_deref()) else {
        print_missing_key(&config.llm.api_key_env);
        std::process::exit(1);
    };

    if !cli.input.exists() {
        eprintln!("{} Input file not found: {}", "✗".red(), cli.input.display());
        std::process::exit(1);
    }

    println!("{} Processing dataset", "→".cyan());
    println!("  input:  {}", cli.input.display());
    println!("  output: {}", cli.output.display());
    info!(model = %config.llm.model, "main: starting run");

    let prompts = PromptLoader::new(config.splitter.prompts_dir.as_ref());
    let system_prompt = prompts.system_prompt().context("Failed to load system prompt")?;
    let llm = create_client(&config.llm, &api_key).context("Failed to create LLM client")?;
    let oracle = LlmOracle::from_config(llm, system_prompt, &config.llm);
    let splitter = QuestionSplitter::new(Arc::new(oracle), prompts, config.splitter.no_split_token.clone());
    let annotator = DatasetAnnotator::new(splitter).with_progress(|p| {
        println!("{} {}/{}", "Processing...".dimmed(), p.current, p.total);
    });

    tokio::select! {
        result = annotator.process_file(&cli.input, &cli.output) => {
            match result {
                Ok(summary) => {
                    println!(
                        "{} Done: {} of {} questions split. Results saved to {}",
                        "✓".green(),
                        summary.split.to_string().cyan(),
                        summary.processed,
                        cli.output.display()
                    );
                }
                Err(e) => {
                    eprintln!("{} Error: {:#}", "✗".red(), e);
                    std::process::exit(1);
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("{} Interrupted by user; no output written", "!".yellow());
        }
    }

    Ok(())
}
