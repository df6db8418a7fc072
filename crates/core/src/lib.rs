//! docchat core library
//!
//! Foundational utilities shared across the workspace:
//! - Error handling (`AppError`, `AppResult`)
//! - Configuration management, validated eagerly at startup
//! - Logging infrastructure

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, EmbeddingConfig, GenerationConfig, GeneratorConfig, RetrievalConfig};
pub use error::{AppError, AppResult};
