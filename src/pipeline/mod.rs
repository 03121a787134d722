//! The retrieval pipeline.
//!
//! A request is routed exactly once, at the boundary, into one of two
//! branches:
//!
//! - ingest: extract -> chunk -> embed -> store
//! - query:  retrieve -> answer
//!
//! State is a typed record of optional fields; each step returns a partial
//! [`StateUpdate`] merged additively into the running [`PipelineState`].
//! Merges never clear fields, so `embeddings[i]` stays aligned with
//! `chunks[i]` for the life of an invocation. State is created fresh per
//! invocation and never shared across invocations.

mod ingest;
mod query;

use std::sync::Arc;

use crate::embedding::Embedder;
use crate::errors::ApiError;
use crate::llm::Generator;
use crate::store::VectorStore;

/// A pipeline invocation, decided once at the boundary. When a caller
/// supplies both a document and a question, the document wins.
#[derive(Debug, Clone)]
pub enum PipelineRequest {
    /// Ingest a document: `input` is a file path or the text itself,
    /// `source` labels where it came from (filename, "inline", ...).
    Ingest { input: String, source: String },
    /// Answer a question against the stored corpus.
    Query { question: String },
}

impl PipelineRequest {
    /// Routing rule: a non-empty `text` takes the ingest branch; otherwise
    /// a non-empty `question` takes the query branch.
    pub fn from_parts(text: Option<&str>, question: Option<&str>) -> Option<Self> {
        if let Some(text) = text {
            if !text.trim().is_empty() {
                return Some(PipelineRequest::Ingest {
                    input: text.to_string(),
                    source: "inline".to_string(),
                });
            }
        }
        question.map(|q| PipelineRequest::Query {
            question: q.to_string(),
        })
    }
}

/// Accumulated pipeline state. Fields stay `None` until the step that
/// produces them has run; absence means "this branch not taken yet".
#[derive(Debug, Default, Clone)]
pub struct PipelineState {
    pub text: Option<String>,
    pub chunks: Option<Vec<String>>,
    pub embeddings: Option<Vec<Vec<f32>>>,
    pub question: Option<String>,
    pub query_embedding: Option<Vec<f32>>,
    pub retrieved_chunks: Option<Vec<String>>,
    pub answer: Option<String>,
    /// Number of rows persisted by the ingest branch.
    pub stored: Option<usize>,
    /// Reason the query branch degraded to empty results, if it did.
    pub failure: Option<String>,
}

impl PipelineState {
    pub fn merge(&mut self, update: StateUpdate) {
        if let Some(text) = update.text {
            self.text = Some(text);
        }
        if let Some(chunks) = update.chunks {
            self.chunks = Some(chunks);
        }
        if let Some(embeddings) = update.embeddings {
            self.embeddings = Some(embeddings);
        }
        if let Some(question) = update.question {
            self.question = Some(question);
        }
        if let Some(query_embedding) = update.query_embedding {
            self.query_embedding = Some(query_embedding);
        }
        if let Some(retrieved_chunks) = update.retrieved_chunks {
            self.retrieved_chunks = Some(retrieved_chunks);
        }
        if let Some(answer) = update.answer {
            self.answer = Some(answer);
        }
        if let Some(stored) = update.stored {
            self.stored = Some(stored);
        }
        if let Some(failure) = update.failure {
            self.failure = Some(failure);
        }
    }
}

/// Partial output of a single step.
#[derive(Debug, Default)]
pub struct StateUpdate {
    pub text: Option<String>,
    pub chunks: Option<Vec<String>>,
    pub embeddings: Option<Vec<Vec<f32>>>,
    pub question: Option<String>,
    pub query_embedding: Option<Vec<f32>>,
    pub retrieved_chunks: Option<Vec<String>>,
    pub answer: Option<String>,
    pub stored: Option<usize>,
    pub failure: Option<String>,
}

/// Sequences the branch steps over the external collaborators.
pub struct Pipeline {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Pipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            generator,
            store,
            top_k,
        }
    }

    pub(crate) fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub(crate) fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub(crate) fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }

    pub(crate) fn top_k(&self) -> usize {
        self.top_k
    }

    /// Run one invocation to its terminal state.
    ///
    /// The query branch never returns `Err`: every external failure there
    /// degrades to an empty result with the reason recorded in
    /// `state.failure`. Ingest-branch embedding/storage failures propagate
    /// so the upload endpoint can surface them.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineState, ApiError> {
        match request {
            PipelineRequest::Ingest { input, source } => self.run_ingest(&input, &source).await,
            PipelineRequest::Query { question } => Ok(self.run_query(&question).await),
        }
    }
}
