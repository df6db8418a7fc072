//! Check command handler.
//!
//! Runs the startup validation path without answering anything: validates
//! the configuration, opens the pre-built retrieval index, and reports the
//! configured backends. Useful before pointing traffic at a deployment.

use clap::Args;
use docchat_core::{AppConfig, AppResult};
use docchat_retrieval::{LanceIndex, Retriever};

/// Validate configuration and the retrieval index
#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Execute the check command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing check command");

        config.validate()?;

        let index = LanceIndex::open(
            &config.retrieval.index_path,
            &config.retrieval.table,
            config.embedding.dimensions,
        )
        .await?;
        let excerpt_count = index.count().await?;

        println!("Configuration OK");
        println!(
            "  embedding:  {} / {} ({} dimensions)",
            config.embedding.provider, config.embedding.model, config.embedding.dimensions
        );
        println!(
            "  retrieval:  {:?} (table '{}', top-{}, {} excerpts)",
            config.retrieval.index_path,
            config.retrieval.table,
            config.retrieval.top_k,
            excerpt_count
        );
        println!(
            "  primary:    {} / {}",
            config.generation.primary.provider, config.generation.primary.model
        );
        println!(
            "  fallback:   {} / {}",
            config.generation.fallback.provider, config.generation.fallback.model
        );
        println!("  history:    last {} user turns", config.history_max_length);

        Ok(())
    }
}
