//! Retrieval index abstraction.
//!
//! The answering path treats the excerpt index as a black box: given a query
//! embedding it returns the top-k most relevant excerpts. Building and
//! refreshing the index is a separate operational concern.

use crate::excerpt::Excerpt;
use docchat_core::AppResult;

/// Trait for retrieval index backends.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Search for the top-k excerpts most similar to the query embedding.
    ///
    /// Returns excerpts ordered by descending relevance, ties broken by the
    /// backend's stable internal order. An empty result set is a normal
    /// outcome, not an error; backend failures surface as
    /// `AppError::RetrievalUnavailable`.
    async fn retrieve(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<Excerpt>>;

    /// Number of excerpts in the index, for diagnostics.
    async fn count(&self) -> AppResult<usize>;
}
