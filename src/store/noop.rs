//! Store used when the database is bypassed (evaluation runs).

use async_trait::async_trait;

use super::{DocumentChunk, ScoredChunk, VectorStore};
use crate::errors::ApiError;

/// Accepts inserts without persisting anything and retrieves nothing.
#[derive(Debug, Default, Clone)]
pub struct NoopVectorStore;

#[async_trait]
impl VectorStore for NoopVectorStore {
    async fn insert(&self, _chunk: DocumentChunk, _embedding: Vec<f32>) -> Result<(), ApiError> {
        Ok(())
    }

    async fn insert_batch(&self, _items: Vec<(DocumentChunk, Vec<f32>)>) -> Result<(), ApiError> {
        Ok(())
    }

    async fn query_nearest(
        &self,
        _query_embedding: &[f32],
        _limit: usize,
    ) -> Result<Vec<ScoredChunk>, ApiError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize, ApiError> {
        Ok(0)
    }
}
