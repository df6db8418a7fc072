//! Generator abstraction and request/response types.
//!
//! The pipeline runs two independently configured generator instances,
//! primary and fallback, behind the same trait. Each call is a single
//! blocking unit of work returning one reply text; no streaming.

use docchat_core::AppResult;
use serde::{Deserialize, Serialize};

/// Generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The rendered prompt text
    pub prompt: String,

    /// Model identifier (e.g., "phi4", "llama3.2")
    pub model: String,

    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a new request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated reply text
    pub content: String,

    /// Model that generated the reply
    pub model: String,
}

/// Trait for generation backends.
///
/// Abstracts the underlying provider (Ollama, HuggingFace Inference, ...)
/// behind one capability: turn a rendered prompt into a reply. Failures
/// surface as `AppError::GenerationUnavailable` and are never retried
/// inside the pipeline.
#[async_trait::async_trait]
pub trait Generator: Send + Sync + std::fmt::Debug {
    /// Get the provider name (e.g., "ollama", "huggingface").
    fn provider_name(&self) -> &str;

    /// Produce a single reply for the given request.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationResponse>;
}
