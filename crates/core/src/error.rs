//! Error types for the docchat answer pipeline.
//!
//! This module defines the unified error enum shared by every crate in the
//! workspace: startup configuration failures, per-request adapter failures,
//! the generic answer-generation outcome surfaced to callers, and the
//! distinct cancellation outcome.

use thiserror::Error;

/// Unified error type for the docchat workspace.
///
/// All fallible functions return `AppResult<T>`. We never panic; errors
/// must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing startup configuration. Fatal at startup; the
    /// process must not begin serving requests.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedding backend could not produce a query vector.
    /// Non-retryable for the current request.
    #[error("Embedding backend unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The retrieval index could not be searched.
    /// Non-retryable for the current request.
    #[error("Retrieval index unavailable: {0}")]
    RetrievalUnavailable(String),

    /// A generation backend (primary or fallback) failed.
    /// Non-retryable for the current request.
    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(String),

    /// Generic per-request outcome surfaced to the calling collaborator.
    /// Wraps the adapter failure that terminated the pipeline; callers log
    /// the cause and must not persist a fabricated assistant message.
    #[error("Answer generation failed")]
    AnswerGenerationFailed(#[source] Box<AppError>),

    /// The caller aborted the request or a timeout elapsed mid-chain.
    /// Deliberately distinct from `AnswerGenerationFailed`.
    #[error("Request cancelled")]
    Cancelled,

    /// Prompt template registration or rendering errors. Template problems
    /// are configuration mistakes and surface at startup.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Wrap a per-request adapter failure into the generic outcome returned
    /// to callers. Only the three adapter variants are wrapped; cancellation
    /// and every other error pass through unchanged.
    pub fn into_answer_failure(self) -> AppError {
        match self {
            AppError::EmbeddingUnavailable(_)
            | AppError::RetrievalUnavailable(_)
            | AppError::GenerationUnavailable(_) => AppError::AnswerGenerationFailed(Box::new(self)),
            other => other,
        }
    }

    /// Whether this error is the caller-initiated cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_failure_wraps_into_answer_failure() {
        let err = AppError::EmbeddingUnavailable("connection refused".to_string());
        match err.into_answer_failure() {
            AppError::AnswerGenerationFailed(cause) => {
                assert!(matches!(*cause, AppError::EmbeddingUnavailable(_)));
            }
            other => panic!("Expected AnswerGenerationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_is_not_wrapped() {
        let err = AppError::Cancelled.into_answer_failure();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_wrapped_error_is_not_double_wrapped() {
        let inner = AppError::RetrievalUnavailable("index gone".to_string());
        let wrapped = inner.into_answer_failure().into_answer_failure();
        match wrapped {
            AppError::AnswerGenerationFailed(cause) => {
                assert!(matches!(*cause, AppError::RetrievalUnavailable(_)));
            }
            other => panic!("Expected single wrap, got {other:?}"),
        }
    }

    #[test]
    fn test_config_error_is_not_wrapped() {
        let err = AppError::Config("bad".to_string()).into_answer_failure();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_display_carries_cause_for_logging() {
        use std::error::Error;
        let err = AppError::GenerationUnavailable("503".to_string()).into_answer_failure();
        let source = err.source().expect("cause must be preserved");
        assert!(source.to_string().contains("503"));
    }
}
