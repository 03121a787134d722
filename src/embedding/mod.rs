//! Text embedding.
//!
//! `Embedder` abstracts the hosted embedding API so the pipeline can be
//! exercised with a deterministic implementation in tests. The production
//! implementation is `GeminiEmbedder`.

mod gemini;

pub use gemini::GeminiEmbedder;

use async_trait::async_trait;

use crate::errors::ApiError;

/// Task hint forwarded to the embedding model. Documents and queries are
/// embedded with different task types so the model can optimize for
/// retrieval asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    Document,
    Query,
}

impl EmbeddingTask {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            EmbeddingTask::Document => "RETRIEVAL_DOCUMENT",
            EmbeddingTask::Query => "RETRIEVAL_QUERY",
        }
    }
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text span into a fixed-dimension vector.
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Vec<f32>, ApiError>;
}
