//! Configuration management for the docchat answer pipeline.
//!
//! Configuration is loaded exactly once at process start and is immutable
//! afterwards: defaults, then an optional YAML file (`docchat.yaml`), then
//! environment variables, then CLI overrides. `validate()` runs eagerly so
//! that a bad `history_max_length`, a missing index directory, or a missing
//! credential is a startup failure and never a per-request failure.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Providers accepted for embedding and generation backends.
const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "huggingface"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Number of most recent user turns fed into prompt construction
    /// (the active query counts as the newest turn).
    #[serde(rename = "historyMaxLength", default = "default_history_max_length")]
    pub history_max_length: usize,

    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval index configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Generation backend configuration (primary and fallback instances)
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    #[serde(skip)]
    pub verbose: bool,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,
}

fn default_history_max_length() -> usize {
    3
}

/// Embedding backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider identifier ("ollama", "huggingface")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// Fixed embedding dimension produced by the model
    pub dimensions: usize,

    /// Optional custom endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API token, for providers that need one
    #[serde(rename = "apiKeyEnv", skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            endpoint: None,
            api_key_env: None,
        }
    }
}

/// Retrieval index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory of the pre-built excerpt index. Building and refreshing
    /// the index is a separate operational step; the answering path only
    /// opens it read-only.
    #[serde(rename = "indexPath")]
    pub index_path: PathBuf,

    /// Table name inside the index
    #[serde(default = "default_table")]
    pub table: String,

    /// Number of excerpts retrieved per query
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,
}

fn default_table() -> String {
    "excerpts".to_string()
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("index"),
            table: default_table(),
            top_k: default_top_k(),
        }
    }
}

/// Generation backends: two independently configured instances sharing one
/// interface. The primary instance is tuned for grounded, citation-bearing
/// answers and is allowed to refuse; the fallback instance is tuned for
/// graceful refusal messaging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub primary: GeneratorConfig,

    #[serde(default)]
    pub fallback: GeneratorConfig,
}

/// Configuration for one generation backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Provider identifier ("ollama", "huggingface")
    pub provider: String,

    /// Chat model identifier
    pub model: String,

    /// Optional custom endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API token, for providers that need one
    #[serde(rename = "apiKeyEnv", skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(rename = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            endpoint: None,
            api_key_env: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            history_max_length: default_history_max_length(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            generation: GenerationConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `DOCCHAT_CONFIG`: path to the config file (default `docchat.yaml`)
    /// - `DOCCHAT_INDEX`: override the retrieval index path
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let config_path = std::env::var("DOCCHAT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("docchat.yaml"));
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file path, then apply
    /// environment overrides.
    pub fn load_from(config_path: &PathBuf) -> AppResult<Self> {
        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(config_path).map_err(|e| {
                AppError::Config(format!("Failed to read config file {config_path:?}: {e}"))
            })?;
            let mut parsed: AppConfig = serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("Failed to parse config file {config_path:?}: {e}"))
            })?;
            parsed.config_file = Some(config_path.clone());
            parsed
        } else {
            Self::default()
        };

        // Environment variables override the YAML file
        if let Ok(index_path) = std::env::var("DOCCHAT_INDEX") {
            config.retrieval.index_path = PathBuf::from(index_path);
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over both the config file and the
    /// environment.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the full configuration eagerly.
    ///
    /// Every check here is a startup-time concern: a failing validation
    /// means the process must not begin answering queries.
    pub fn validate(&self) -> AppResult<()> {
        if self.history_max_length == 0 {
            return Err(AppError::Config(
                "historyMaxLength must be at least 1".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding dimensions must be at least 1".to_string(),
            ));
        }

        if !self.retrieval.index_path.exists() {
            return Err(AppError::Config(format!(
                "Retrieval index not found at {:?}. The index must be built before the \
                 answering service starts.",
                self.retrieval.index_path
            )));
        }

        validate_backend("embedding", &self.embedding.provider, &self.embedding.api_key_env)?;
        validate_backend(
            "generation.primary",
            &self.generation.primary.provider,
            &self.generation.primary.api_key_env,
        )?;
        validate_backend(
            "generation.fallback",
            &self.generation.fallback.provider,
            &self.generation.fallback.api_key_env,
        )?;

        Ok(())
    }

    /// Resolve an API token from the environment variable named in config.
    pub fn resolve_api_key(api_key_env: &Option<String>) -> AppResult<Option<String>> {
        match api_key_env {
            None => Ok(None),
            Some(var) => match std::env::var(var) {
                Ok(key) => Ok(Some(key)),
                Err(_) => Err(AppError::Config(format!(
                    "API key not found in environment variable: {var}"
                ))),
            },
        }
    }
}

/// Validate one backend section: known provider, credential reachable.
fn validate_backend(
    section: &str,
    provider: &str,
    api_key_env: &Option<String>,
) -> AppResult<()> {
    if !KNOWN_PROVIDERS.contains(&provider) {
        return Err(AppError::Config(format!(
            "Unknown provider '{provider}' in {section}. Supported: {}",
            KNOWN_PROVIDERS.join(", ")
        )));
    }

    // HuggingFace inference requires a bearer token; Ollama does not.
    if provider == "huggingface" {
        let var = api_key_env.as_deref().ok_or_else(|| {
            AppError::Config(format!(
                "{section}: huggingface provider requires apiKeyEnv to be set"
            ))
        })?;
        if std::env::var(var).is_err() {
            return Err(AppError::Config(format!(
                "{section}: API key not found in environment variable: {var}"
            )));
        }
    }

    Ok(())
}
