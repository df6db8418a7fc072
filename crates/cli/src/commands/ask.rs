//! Ask command handler.
//!
//! Runs one answer-pipeline invocation over a supplied conversation
//! history. The CLI stands in for the persistence collaborator: it feeds
//! the ordered user turns in and prints the structured result.

use clap::Args;
use docchat_core::{AppConfig, AppError, AppResult};
use docchat_pipeline::AnswerPipeline;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Answer a query against the excerpt index
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The active query (the newest user turn)
    pub query: String,

    /// Prior user turns of the conversation, oldest first (repeatable)
    #[arg(short, long = "turn")]
    pub turns: Vec<String>,

    /// Read prior user turns from a file, one turn per line
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Conversation identifier used for logging
    #[arg(long, default_value = "local")]
    pub conversation: String,

    /// Abort the request after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let history = self.collect_history()?;

        let pipeline = AnswerPipeline::from_config(config).await?;

        let cancel = CancellationToken::new();
        if let Some(secs) = self.timeout {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(secs)).await;
                token.cancel();
            });
        }

        let result = pipeline
            .answer_with_cancel(&self.conversation, &history, cancel)
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!("{}", result.text);
        if !result.citations.is_empty() {
            println!();
            println!("Sources:");
            for citation in &result.citations {
                println!("  - {citation}");
            }
        }
        if result.used_fallback {
            tracing::info!("Answer produced by the fallback branch");
        }

        Ok(())
    }

    /// Assemble the ordered user-turn history: file turns, then --turn
    /// flags, then the active query as the newest entry.
    fn collect_history(&self) -> AppResult<Vec<String>> {
        let mut history = Vec::new();

        if let Some(path) = &self.history_file {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read history file {path:?}: {e}"))
            })?;
            history.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }

        history.extend(self.turns.iter().cloned());
        history.push(self.query.clone());

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(query: &str, turns: &[&str]) -> AskCommand {
        AskCommand {
            query: query.to_string(),
            turns: turns.iter().map(|t| t.to_string()).collect(),
            history_file: None,
            conversation: "local".to_string(),
            timeout: None,
            json: false,
        }
    }

    #[test]
    fn test_collect_history_appends_query_last() {
        let cmd = command("newest", &["older", "old"]);
        let history = cmd.collect_history().unwrap();
        assert_eq!(history, vec!["older", "old", "newest"]);
    }

    #[test]
    fn test_collect_history_query_only() {
        let cmd = command("only", &[]);
        assert_eq!(cmd.collect_history().unwrap(), vec!["only"]);
    }

    #[test]
    fn test_collect_history_reads_file_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        std::fs::write(&path, "first turn\n\n  second turn  \n").unwrap();

        let mut cmd = command("query", &[]);
        cmd.history_file = Some(path);

        let history = cmd.collect_history().unwrap();
        assert_eq!(history, vec!["first turn", "second turn", "query"]);
    }

    #[test]
    fn test_collect_history_missing_file_is_config_error() {
        let mut cmd = command("query", &[]);
        cmd.history_file = Some(PathBuf::from("/nonexistent/history.txt"));
        assert!(matches!(
            cmd.collect_history(),
            Err(AppError::Config(_))
        ));
    }
}
