//! HuggingFace Inference embedding provider.
//!
//! Calls a text-embeddings-inference feature-extraction endpoint with a
//! bearer token. The endpoint URL points at a hosted embedding model, e.g.
//! `https://router.huggingface.co/hf-inference/models/<model>/pipeline/feature-extraction`.

use crate::embedder::Embedder;
use async_trait::async_trait;
use docchat_core::{AppError, AppResult, EmbeddingConfig};
use serde::Serialize;
use tracing::debug;

/// HuggingFace Inference embedding provider.
#[derive(Debug, Clone)]
pub struct HfEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    api_key: String,
}

/// Request payload for the feature-extraction pipeline.
#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}

impl HfEmbedder {
    /// Create a new HuggingFace embedder from configuration.
    ///
    /// The endpoint is required: hosted embedding models have no usable
    /// default URL.
    pub fn new(config: &EmbeddingConfig, api_key: &str) -> AppResult<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            AppError::Config(
                "huggingface embedding provider requires an explicit endpoint".to_string(),
            )
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            model: config.model.clone(),
            dimensions: config.dimensions,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for HfEmbedder {
    fn provider_name(&self) -> &str {
        "huggingface"
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

        debug!("Sending feature-extraction request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&FeatureExtractionRequest { inputs: text })
            .send()
            .await
            .map_err(|e| {
                AppError::EmbeddingUnavailable(format!(
                    "Failed to reach HuggingFace inference endpoint: {e}"
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::EmbeddingUnavailable(format!(
                "HuggingFace API error ({status}): {error_text}"
            )));
        }

        // The pipeline returns either a flat vector or a one-element batch.
        let value: serde_json::Value = response.json().await.map_err(|e| {
            AppError::EmbeddingUnavailable(format!("Failed to parse embedding response: {e}"))
        })?;

        let embedding = parse_embedding(&value).ok_or_else(|| {
            AppError::EmbeddingUnavailable("Malformed embedding response".to_string())
        })?;

        if embedding.len() != self.dimensions {
            return Err(AppError::EmbeddingUnavailable(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                embedding.len(),
                self.dimensions
            )));
        }

        Ok(embedding)
    }
}

/// Extract an embedding vector from a feature-extraction response body.
fn parse_embedding(value: &serde_json::Value) -> Option<Vec<f32>> {
    let array = value.as_array()?;
    // Batched shape: [[f32, ...]]
    let flat = match array.first() {
        Some(serde_json::Value::Array(inner)) => inner,
        _ => array,
    };
    flat.iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_embedding() {
        let value = serde_json::json!([0.1, 0.2, 0.3]);
        let embedding = parse_embedding(&value).unwrap();
        assert_eq!(embedding.len(), 3);
        assert!((embedding[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_batched_embedding() {
        let value = serde_json::json!([[0.1, 0.2]]);
        let embedding = parse_embedding(&value).unwrap();
        assert_eq!(embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let value = serde_json::json!(["a", "b"]);
        assert!(parse_embedding(&value).is_none());
    }

    #[test]
    fn test_new_requires_endpoint() {
        let config = EmbeddingConfig {
            provider: "huggingface".to_string(),
            endpoint: None,
            ..Default::default()
        };
        let err = HfEmbedder::new(&config, "token").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
