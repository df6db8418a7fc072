//! Prompt crate for docchat.
//!
//! Renders structured prompts for the two generation paths: the primary
//! template (query + windowed history + retrieved excerpts) and the
//! fallback template (bare query). Templates are data; registration happens
//! once at startup.

pub mod renderer;
pub mod templates;

// Re-export main types
pub use renderer::{PromptMessage, PromptRenderer, TemplateKind};
pub use templates::{FALLBACK_TEMPLATE, PRIMARY_TEMPLATE};
