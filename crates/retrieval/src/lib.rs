//! Retrieval crate for docchat.
//!
//! Covers the two external dependency boundaries on the answering path:
//! - **Embedder**: maps the query text to a fixed-dimension vector
//! - **Retriever**: returns the top-k relevant excerpts for a query vector
//!
//! Both are trait objects so the pipeline can be exercised with test
//! doubles. The production retriever is a LanceDB table of pre-embedded
//! excerpts, opened read-only at startup.

pub mod embedder;
pub mod excerpt;
pub mod index;
pub mod lance;
pub mod providers;

// Re-export main types
pub use embedder::{create_embedder, Embedder};
pub use excerpt::{citation_titles, Excerpt};
pub use index::Retriever;
pub use lance::LanceIndex;
