//! Generator factory.
//!
//! Creates generation clients from configuration. The pipeline constructs
//! two instances through this factory (primary and fallback) so each
//! branch can be tuned and model-selected independently.

use crate::generator::Generator;
use crate::providers::{HfGenerator, OllamaGenerator};
use docchat_core::{AppConfig, AppError, AppResult, GeneratorConfig};
use std::sync::Arc;

/// Create a generation client from one backend configuration.
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// credential is missing. Configuration problems are startup failures.
pub fn create_generator(config: &GeneratorConfig) -> AppResult<Arc<dyn Generator>> {
    match config.provider.as_str() {
        "ollama" => {
            let generator = match &config.endpoint {
                Some(endpoint) => OllamaGenerator::with_base_url(endpoint),
                None => OllamaGenerator::new(),
            };
            Ok(Arc::new(generator))
        }
        "huggingface" => {
            let api_key = AppConfig::resolve_api_key(&config.api_key_env)?.ok_or_else(|| {
                AppError::Config(
                    "huggingface generation provider requires apiKeyEnv to be set".to_string(),
                )
            })?;
            let generator = match &config.endpoint {
                Some(endpoint) => HfGenerator::with_base_url(endpoint, api_key),
                None => HfGenerator::new(api_key),
            };
            Ok(Arc::new(generator))
        }
        other => Err(AppError::Config(format!(
            "Unknown generation provider: '{other}'. Supported providers: ollama, huggingface"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_generator() {
        let config = GeneratorConfig::default();
        let generator = create_generator(&config).unwrap();
        assert_eq!(generator.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let config = GeneratorConfig {
            endpoint: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };
        assert!(create_generator(&config).is_ok());
    }

    #[test]
    fn test_huggingface_requires_api_key_env() {
        let config = GeneratorConfig {
            provider: "huggingface".to_string(),
            model: "microsoft/phi-4".to_string(),
            api_key_env: None,
            ..Default::default()
        };
        let err = create_generator(&config).unwrap_err();
        assert!(err.to_string().contains("apiKeyEnv"));
    }

    #[test]
    fn test_unknown_provider() {
        let config = GeneratorConfig {
            provider: "bedrock".to_string(),
            ..Default::default()
        };
        let err = create_generator(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown generation provider"));
    }
}
