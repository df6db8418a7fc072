//! Ollama embedding provider.
//!
//! Generates query embeddings via Ollama's local API using models like
//! nomic-embed-text. Requests are single-shot: adapter failures terminate
//! the current pipeline run and retrying is the caller's responsibility.

use crate::embedder::Embedder;
use async_trait::async_trait;
use docchat_core::{AppError, AppResult, EmbeddingConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Ollama embedding provider using the local API.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

/// Request payload for the Ollama embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

/// Response from the Ollama embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder from configuration.
    pub fn new(config: &EmbeddingConfig) -> Self {
        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Self {
            client: reqwest::Client::new(),
            base_url,
            model: config.model.clone(),
            dimensions: config.dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::EmbeddingUnavailable(
                "Cannot embed empty text".to_string(),
            ));
        }

        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        debug!("Sending embedding request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::EmbeddingUnavailable(format!("Failed to send request to Ollama: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::EmbeddingUnavailable(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::EmbeddingUnavailable(format!("Failed to parse Ollama response: {e}"))
        })?;

        if body.embedding.len() != self.dimensions {
            return Err(AppError::EmbeddingUnavailable(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                body.embedding.len(),
                self.dimensions
            )));
        }

        debug!(
            "Generated {} dimensional embedding for query",
            body.embedding.len()
        );

        Ok(body.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_metadata_from_config() {
        let config = EmbeddingConfig {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            endpoint: Some("http://localhost:8080".to_string()),
            api_key_env: None,
        };
        let embedder = OllamaEmbedder::new(&config);
        assert_eq!(embedder.provider_name(), "ollama");
        assert_eq!(embedder.dimensions(), 768);
        assert_eq!(embedder.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_text() {
        let embedder = OllamaEmbedder::new(&EmbeddingConfig::default());
        let err = embedder.embed("   ").await.unwrap_err();
        assert!(matches!(err, AppError::EmbeddingUnavailable(_)));
    }

    #[test]
    fn test_request_serialization() {
        let request = EmbeddingRequest {
            model: "nomic-embed-text".to_string(),
            prompt: "hello".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["prompt"], "hello");
    }
}
