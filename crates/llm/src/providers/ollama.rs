//! Ollama generation provider.
//!
//! Integration with Ollama's local runtime via the non-streaming
//! `/api/generate` endpoint.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::generator::{GenerationRequest, GenerationResponse, Generator};
use docchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    stream: bool,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
}

/// Ollama generation client.
#[derive(Debug)]
pub struct OllamaGenerator {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a client against the default local endpoint.
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:11434")
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_ollama_request(&self, request: &GenerationRequest) -> OllamaRequest {
        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            temperature: request.temperature,
            num_predict: request.max_tokens,
            stream: false,
        }
    }
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Generator for OllamaGenerator {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationResponse> {
        tracing::debug!("Sending generation request to Ollama (model: {})", request.model);

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                AppError::GenerationUnavailable(format!("Failed to send request to Ollama: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::GenerationUnavailable(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            AppError::GenerationUnavailable(format!("Failed to parse Ollama response: {e}"))
        })?;

        tracing::debug!("Received reply from Ollama");

        Ok(GenerationResponse {
            content: ollama_response.response,
            model: ollama_response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_conversion() {
        let generator = OllamaGenerator::new();
        let request = GenerationRequest::new("answer this", "phi4")
            .with_temperature(0.3)
            .with_max_tokens(800);

        let ollama_request = generator.to_ollama_request(&request);
        assert_eq!(ollama_request.model, "phi4");
        assert_eq!(ollama_request.prompt, "answer this");
        assert_eq!(ollama_request.temperature, Some(0.3));
        assert_eq!(ollama_request.num_predict, Some(800));
        assert!(!ollama_request.stream);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"model":"phi4","response":"Hi there!","done":true}"#;
        let response: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.model, "phi4");
        assert_eq!(response.response, "Hi there!");
    }

    #[test]
    fn test_custom_base_url() {
        let generator = OllamaGenerator::with_base_url("http://localhost:8080");
        assert_eq!(generator.base_url, "http://localhost:8080");
    }
}
