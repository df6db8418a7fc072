//! Embedder trait and factory.
//!
//! Maps text to a fixed-dimension vector. On the answering path only the
//! query is embedded; the excerpt corpus is pre-embedded by the out-of-scope
//! ingestion process.

use docchat_core::{AppError, AppResult, EmbeddingConfig};
use std::sync::Arc;

/// Trait for embedding backends.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "huggingface")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get the fixed embedding dimension
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    ///
    /// May perform a network call; failures surface as
    /// `AppError::EmbeddingUnavailable` and are not retried in-core.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}

/// Create an embedding backend from configuration.
///
/// # Errors
/// Returns `AppError::Config` for unknown providers or missing credentials.
pub fn create_embedder(
    config: &EmbeddingConfig,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "ollama" => {
            let provider = crate::providers::ollama::OllamaEmbedder::new(config);
            Ok(Arc::new(provider))
        }
        "huggingface" => {
            let key = api_key.ok_or_else(|| {
                AppError::Config("huggingface embedding provider requires an API key".to_string())
            })?;
            let provider = crate::providers::huggingface::HfEmbedder::new(config, key)?;
            Ok(Arc::new(provider))
        }
        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{other}'. Supported providers: ollama, huggingface"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_embedder() {
        let config = EmbeddingConfig::default();
        let embedder = create_embedder(&config, None).unwrap();
        assert_eq!(embedder.provider_name(), "ollama");
        assert_eq!(embedder.model_name(), "nomic-embed-text");
        assert_eq!(embedder.dimensions(), 768);
    }

    #[test]
    fn test_create_unknown_embedder() {
        let config = EmbeddingConfig {
            provider: "azure".to_string(),
            ..Default::default()
        };
        let err = create_embedder(&config, None).unwrap_err();
        assert!(err.to_string().contains("Unknown embedding provider"));
    }

    #[test]
    fn test_huggingface_embedder_requires_api_key() {
        let config = EmbeddingConfig {
            provider: "huggingface".to_string(),
            ..Default::default()
        };
        let err = create_embedder(&config, None).unwrap_err();
        assert!(err.to_string().contains("requires an API key"));
    }
}
