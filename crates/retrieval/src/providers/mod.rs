//! Embedding provider implementations.

pub mod huggingface;
pub mod ollama;

pub use huggingface::HfEmbedder;
pub use ollama::OllamaEmbedder;
