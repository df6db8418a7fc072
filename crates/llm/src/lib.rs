//! Generation crate for docchat.
//!
//! Provider-agnostic abstraction over the generation backends used by the
//! answer pipeline. Two independently configured instances, primary and
//! fallback, are polymorphic over the single `Generator` capability.
//!
//! # Providers
//! - **Ollama**: local runtime (default)
//! - **HuggingFace Inference**: hosted serverless chat models

pub mod factory;
pub mod generator;
pub mod providers;

// Re-export main types
pub use factory::create_generator;
pub use generator::{GenerationRequest, GenerationResponse, Generator};
pub use providers::{HfGenerator, OllamaGenerator};
