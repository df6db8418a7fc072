//! Generation provider implementations.

pub mod huggingface;
pub mod ollama;

pub use huggingface::HfGenerator;
pub use ollama::OllamaGenerator;
