//! docchat CLI
//!
//! Command-line front end for the retrieval-augmented answer pipeline.
//! Stands in for the persistence collaborator: supplies conversation
//! history, receives the structured answer.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, CheckCommand};
use docchat_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// docchat - document question answering over a pre-built excerpt index
#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(about = "Answer questions grounded in retrieved document excerpts", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: docchat.yaml)
    #[arg(short, long, global = true, env = "DOCCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a query against the excerpt index
    Ask(AskCommand),

    /// Validate configuration and the retrieval index
    Check(CheckCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Apply CLI overrides
    let config = config.with_overrides(cli.log_level, cli.verbose, cli.no_color);

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("docchat starting");
    tracing::debug!("Index: {:?}", config.retrieval.index_path);
    tracing::debug!(
        "Generators: primary {} / fallback {}",
        config.generation.primary.model,
        config.generation.fallback.model
    );

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Check(_) => "check",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Check(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
