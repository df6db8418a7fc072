//! LanceDB-backed retrieval index.
//!
//! Opens a pre-built excerpt table read-only and serves nearest-neighbour
//! queries. The expected schema is written by the out-of-scope ingestion
//! process: `id`, `source_id`, `title` (nullable), `content`, and a
//! fixed-size `embedding` vector column.

use crate::excerpt::Excerpt;
use crate::index::Retriever;
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch, StringArray};
use docchat_core::{AppError, AppResult};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Table;
use std::path::Path;

/// LanceDB-backed retrieval index over pre-embedded excerpts.
pub struct LanceIndex {
    table: Table,
    dimensions: usize,
}

impl LanceIndex {
    /// Open an existing index.
    ///
    /// A missing directory or table is a configuration error: the index must
    /// exist before the answering service starts, and the answering path
    /// never creates or mutates it.
    pub async fn open(db_path: &Path, table_name: &str, dimensions: usize) -> AppResult<Self> {
        if !db_path.exists() {
            return Err(AppError::Config(format!(
                "Retrieval index not found at {db_path:?}"
            )));
        }

        let uri = db_path.to_string_lossy().to_string();
        let conn = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| AppError::Config(format!("Failed to open retrieval index: {e}")))?;

        let table_names = conn
            .table_names()
            .execute()
            .await
            .map_err(|e| AppError::Config(format!("Failed to list index tables: {e}")))?;

        if !table_names.contains(&table_name.to_string()) {
            return Err(AppError::Config(format!(
                "Retrieval index at {db_path:?} has no '{table_name}' table. \
                 Build the index before starting the answering service."
            )));
        }

        let table = conn
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| AppError::Config(format!("Failed to open index table: {e}")))?;

        tracing::debug!("Opened retrieval index at {:?}", db_path);

        Ok(Self { table, dimensions })
    }

    /// Convert one Arrow row to an excerpt, scoring it against the query.
    fn row_to_excerpt(
        batch: &RecordBatch,
        row_idx: usize,
        query_embedding: &[f32],
    ) -> AppResult<Excerpt> {
        let content = string_column(batch, "content")?.value(row_idx).to_string();
        let source_id = string_column(batch, "source_id")?.value(row_idx).to_string();

        let title_column = string_column(batch, "title")?;
        let title = if title_column.is_null(row_idx) {
            None
        } else {
            Some(title_column.value(row_idx).to_string())
        };

        let embedding_list = batch
            .column_by_name("embedding")
            .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
            .ok_or_else(|| {
                AppError::RetrievalUnavailable("Invalid embedding column".to_string())
            })?;

        let embedding_ref = embedding_list.value(row_idx);
        let values = embedding_ref
            .as_any()
            .downcast_ref::<Float32Array>()
            .ok_or_else(|| {
                AppError::RetrievalUnavailable("Invalid embedding values".to_string())
            })?;
        let embedding: Vec<f32> = (0..values.len()).map(|i| values.value(i)).collect();

        Ok(Excerpt {
            content,
            title,
            source_id,
            score: cosine_similarity(query_embedding, &embedding),
        })
    }
}

#[async_trait::async_trait]
impl Retriever for LanceIndex {
    async fn retrieve(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<Excerpt>> {
        if query_embedding.len() != self.dimensions {
            return Err(AppError::RetrievalUnavailable(format!(
                "Query embedding dimension mismatch: expected {}, got {}",
                self.dimensions,
                query_embedding.len()
            )));
        }

        let batches = self
            .table
            .query()
            .nearest_to(query_embedding.to_vec())
            .map_err(|e| AppError::RetrievalUnavailable(format!("Failed to create query: {e}")))?
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| AppError::RetrievalUnavailable(format!("Failed to execute search: {e}")))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| {
                AppError::RetrievalUnavailable(format!("Failed to collect results: {e}"))
            })?;

        let mut excerpts = Vec::new();
        for batch in &batches {
            for row_idx in 0..batch.num_rows() {
                excerpts.push(Self::row_to_excerpt(batch, row_idx, query_embedding)?);
            }
        }

        // Stable sort keeps the backend's order for equal scores.
        excerpts.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(
            "Retrieved {} excerpts (requested top-{})",
            excerpts.len(),
            top_k
        );

        Ok(excerpts)
    }

    async fn count(&self) -> AppResult<usize> {
        self.table
            .count_rows(None)
            .await
            .map_err(|e| AppError::RetrievalUnavailable(format!("Failed to count excerpts: {e}")))
    }
}

/// Get a string column by name.
fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> AppResult<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| AppError::RetrievalUnavailable(format!("Invalid {name} column")))
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::RecordBatch;
    use arrow_schema::{DataType, Field, Schema};
    use std::sync::Arc;

    fn test_batch(titles: Vec<Option<&str>>) -> RecordBatch {
        let dim = 2;
        let rows = titles.len();
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("source_id", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, true),
            Field::new("content", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    dim,
                ),
                false,
            ),
        ]));

        let ids: Vec<String> = (0..rows).map(|i| format!("chunk-{i}")).collect();
        let source_ids: Vec<String> = (0..rows).map(|i| format!("doc-{i}")).collect();
        let contents: Vec<String> = (0..rows).map(|i| format!("excerpt {i}")).collect();

        let embedding_values = Float32Array::from(vec![1.0_f32; rows * dim as usize]);
        let embedding_array = FixedSizeListArray::new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            dim,
            Arc::new(embedding_values),
            None,
        );

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(source_ids)),
                Arc::new(StringArray::from(titles)),
                Arc::new(StringArray::from(contents)),
                Arc::new(embedding_array),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_to_excerpt_decodes_fields() {
        let batch = test_batch(vec![Some("Doc A"), None]);
        let query = vec![1.0, 1.0];

        let first = LanceIndex::row_to_excerpt(&batch, 0, &query).unwrap();
        assert_eq!(first.content, "excerpt 0");
        assert_eq!(first.source_id, "doc-0");
        assert_eq!(first.title.as_deref(), Some("Doc A"));
        assert!((first.score - 1.0).abs() < 1e-6);

        let second = LanceIndex::row_to_excerpt(&batch, 1, &query).unwrap();
        assert!(second.title.is_none());
    }

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let v = vec![0.5, 0.5, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
