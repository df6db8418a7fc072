//! Answer pipeline crate for docchat.
//!
//! The orchestrator that turns a conversation's user-turn history into a
//! grounded answer: history windowing, query embedding, excerpt retrieval,
//! primary generation, sentinel-based answerability branching, and fallback
//! generation. Everything is created fresh per invocation and discarded
//! once the `PipelineResult` is returned; durable storage belongs to the
//! calling collaborator.

pub mod history;
pub mod pipeline;
pub mod types;

// Re-export main types
pub use history::window_history;
pub use pipeline::{AnswerPipeline, GeneratorHandle, PipelineSettings};
pub use types::{strip_newlines, PipelineResult, Stage, NO_ANSWER_SENTINEL};
