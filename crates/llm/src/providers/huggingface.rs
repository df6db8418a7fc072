//! HuggingFace Inference generation provider.
//!
//! Talks to the serverless inference router's OpenAI-compatible
//! chat-completions endpoint with a bearer token.

use crate::generator::{GenerationRequest, GenerationResponse, Generator};
use docchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_ROUTER_URL: &str = "https://router.huggingface.co/v1";

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// HuggingFace Inference generation client.
#[derive(Debug)]
pub struct HfGenerator {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HfGenerator {
    /// Create a client against the serverless inference router.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_ROUTER_URL, api_key)
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl Generator for HfGenerator {
    fn provider_name(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationResponse> {
        tracing::debug!(
            "Sending chat-completions request to HuggingFace (model: {})",
            request.model
        );

        let chat_request = self.to_chat_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                AppError::GenerationUnavailable(format!(
                    "Failed to reach HuggingFace inference API: {e}"
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::GenerationUnavailable(format!(
                "HuggingFace API error ({status}): {error_text}"
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AppError::GenerationUnavailable(format!("Failed to parse HuggingFace response: {e}"))
        })?;

        let reply = chat_response.choices.into_iter().next().ok_or_else(|| {
            AppError::GenerationUnavailable("HuggingFace response contained no choices".to_string())
        })?;

        tracing::debug!("Received reply from HuggingFace");

        Ok(GenerationResponse {
            content: reply.message.content,
            model: chat_response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_includes_system_message() {
        let generator = HfGenerator::new("token");
        let request = GenerationRequest::new("the prompt", "microsoft/phi-4")
            .with_system("the system");

        let chat_request = generator.to_chat_request(&request);
        assert_eq!(chat_request.messages.len(), 2);
        assert_eq!(chat_request.messages[0].role, "system");
        assert_eq!(chat_request.messages[1].role, "user");
        assert_eq!(chat_request.messages[1].content, "the prompt");
    }

    #[test]
    fn test_chat_request_without_system_message() {
        let generator = HfGenerator::new("token");
        let request = GenerationRequest::new("the prompt", "microsoft/phi-4");

        let chat_request = generator.to_chat_request(&request);
        assert_eq!(chat_request.messages.len(), 1);
        assert_eq!(chat_request.messages[0].role, "user");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "model": "microsoft/phi-4",
            "choices": [{"message": {"role": "assistant", "content": "no_answer"}}]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "no_answer");
    }
}
