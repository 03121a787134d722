//! Ingest branch: extract -> chunk -> embed -> store.

use crate::chunker;
use crate::embedding::EmbeddingTask;
use crate::errors::ApiError;
use crate::extract;
use crate::store::DocumentChunk;

use super::{Pipeline, PipelineState, StateUpdate};

impl Pipeline {
    pub(super) async fn run_ingest(
        &self,
        input: &str,
        source: &str,
    ) -> Result<PipelineState, ApiError> {
        let mut state = PipelineState::default();

        state.merge(extract_step(input));

        let chunked = chunk_step(state.text.as_deref().unwrap_or_default());
        state.merge(chunked);

        let chunks = state.chunks.clone().unwrap_or_default();
        let embedded = self.embed_step(&chunks).await?;
        state.merge(embedded);

        let stored = self.store_step(&state, source).await?;
        state.merge(stored);

        tracing::info!(
            "ingest complete: {} chunks, {} stored",
            state.chunks.as_ref().map(Vec::len).unwrap_or(0),
            state.stored.unwrap_or(0)
        );

        Ok(state)
    }

    /// One embedder call per chunk; output is positionally aligned with the
    /// input. Empty input is a no-op. Failures propagate: a partially
    /// embedded document must not reach the store.
    async fn embed_step(&self, chunks: &[String]) -> Result<StateUpdate, ApiError> {
        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = self.embedder().embed(chunk, EmbeddingTask::Document).await?;
            embeddings.push(vector);
        }

        Ok(StateUpdate {
            embeddings: Some(embeddings),
            ..Default::default()
        })
    }

    /// Batch-insert `(chunk, embedding)` pairs. Empty or mismatched state
    /// performs zero inserts.
    async fn store_step(
        &self,
        state: &PipelineState,
        source: &str,
    ) -> Result<StateUpdate, ApiError> {
        let chunks = state.chunks.as_deref().unwrap_or_default();
        let embeddings = state.embeddings.as_deref().unwrap_or_default();

        if chunks.is_empty() || embeddings.is_empty() || chunks.len() != embeddings.len() {
            return Ok(StateUpdate {
                stored: Some(0),
                ..Default::default()
            });
        }

        let items: Vec<(DocumentChunk, Vec<f32>)> = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(text, embedding)| (DocumentChunk::new(text.as_str(), source), embedding.clone()))
            .collect();
        let count = items.len();

        self.store().insert_batch(items).await?;

        Ok(StateUpdate {
            stored: Some(count),
            ..Default::default()
        })
    }
}

/// Resolve the ingest input to raw document text. Never errors: anything
/// that cannot be read as a document is treated as the text itself.
fn extract_step(input: &str) -> StateUpdate {
    StateUpdate {
        text: Some(extract::extract_text(input)),
        ..Default::default()
    }
}

/// Split the extracted text into sentence chunks. Empty text yields an
/// empty chunk list, not an error.
fn chunk_step(text: &str) -> StateUpdate {
    StateUpdate {
        chunks: Some(chunker::split_sentences(text)),
        ..Default::default()
    }
}
