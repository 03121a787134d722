//! Vector storage.
//!
//! `VectorStore` abstracts the persisted chunk table. The default backend
//! is `SqliteVectorStore` (embeddings as f32 blobs, cosine ranking in
//! process); `NoopVectorStore` backs database-free evaluation runs.

mod noop;
mod sqlite;

pub use noop::NoopVectorStore;
pub use sqlite::SqliteVectorStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// A persisted document chunk. Insert-only: nothing in the system updates
/// or deletes rows once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk_id: String,
    pub text: String,
    /// Where the chunk came from (upload filename, "inline", ...).
    pub source: String,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            chunk_id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A retrieval hit: chunk plus cosine similarity (higher = closer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert a chunk with its embedding vector.
    async fn insert(&self, chunk: DocumentChunk, embedding: Vec<f32>) -> Result<(), ApiError>;

    /// Insert multiple chunks in one transaction.
    async fn insert_batch(&self, items: Vec<(DocumentChunk, Vec<f32>)>) -> Result<(), ApiError>;

    /// Nearest chunks by descending cosine similarity, deduplicated by
    /// exact text with rank order preserved; at most `limit` results.
    async fn query_nearest(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, ApiError>;

    /// Total stored chunk count.
    async fn count(&self) -> Result<usize, ApiError>;
}
