//! Pipeline integration tests: both branches end to end against a scratch
//! SQLite store, with deterministic embedder/generator doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use docqa_backend::embedding::{Embedder, EmbeddingTask};
use docqa_backend::errors::ApiError;
use docqa_backend::llm::Generator;
use docqa_backend::pipeline::{Pipeline, PipelineRequest};
use docqa_backend::store::{DocumentChunk, ScoredChunk, SqliteVectorStore, VectorStore};

/// Embeds text as term counts over a tiny fixed vocabulary, so similarity
/// deterministically favors topical overlap.
struct VocabEmbedder {
    calls: AtomicUsize,
}

const VOCAB: [&str; 4] = ["dental", "vision", "a", "b"];

impl VocabEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for VocabEmbedder {
    async fn embed(&self, text: &str, _task: EmbeddingTask) -> Result<Vec<f32>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .collect();

        Ok(VOCAB
            .iter()
            .map(|term| words.iter().filter(|w| w.as_str() == *term).count() as f32)
            .collect())
    }
}

/// Embedder that always fails, for the query-degradation path.
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str, _task: EmbeddingTask) -> Result<Vec<f32>, ApiError> {
        Err(ApiError::Internal("embedding service down".to_string()))
    }
}

/// Generator that answers with the first line of the prompt's context
/// block, i.e. the top retrieved chunk.
struct EchoGenerator {
    calls: AtomicUsize,
}

impl EchoGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let context = prompt
            .split("Context:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\nQuestion:").next())
            .unwrap_or_default();

        let top = context.lines().next().unwrap_or_default();
        if top.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("According to the document, {}", top))
        }
    }
}

/// Store whose queries always fail, for the retrieval-degradation path.
struct FailingStore;

#[async_trait]
impl VectorStore for FailingStore {
    async fn insert(&self, _chunk: DocumentChunk, _embedding: Vec<f32>) -> Result<(), ApiError> {
        Err(ApiError::Internal("db down".to_string()))
    }

    async fn insert_batch(&self, _items: Vec<(DocumentChunk, Vec<f32>)>) -> Result<(), ApiError> {
        Err(ApiError::Internal("db down".to_string()))
    }

    async fn query_nearest(
        &self,
        _query_embedding: &[f32],
        _limit: usize,
    ) -> Result<Vec<ScoredChunk>, ApiError> {
        Err(ApiError::Internal("db down".to_string()))
    }

    async fn count(&self) -> Result<usize, ApiError> {
        Err(ApiError::Internal("db down".to_string()))
    }
}

async fn sqlite_store(dir: &tempfile::TempDir) -> Arc<SqliteVectorStore> {
    Arc::new(
        SqliteVectorStore::new(dir.path().join("test.db"))
            .await
            .unwrap(),
    )
}

fn pipeline(
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    store: Arc<dyn VectorStore>,
) -> Pipeline {
    Pipeline::new(embedder, generator, store, 3)
}

const DOC: &str = "Plan A covers dental. Plan B covers vision.";

#[tokio::test]
async fn ingest_chunks_embeds_and_stores_aligned() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;
    let embedder = Arc::new(VocabEmbedder::new());
    let p = pipeline(embedder.clone(), Arc::new(EchoGenerator::new()), store.clone());

    let state = p
        .run(PipelineRequest::Ingest {
            input: DOC.to_string(),
            source: "inline".to_string(),
        })
        .await
        .unwrap();

    let chunks = state.chunks.unwrap();
    let embeddings = state.embeddings.unwrap();
    assert_eq!(
        chunks,
        vec!["Plan A covers dental.", "Plan B covers vision."]
    );
    assert_eq!(embeddings.len(), chunks.len());
    assert_eq!(state.stored, Some(2));
    assert_eq!(store.count().await.unwrap(), 2);
    assert_eq!(embedder.call_count(), 2);
}

#[tokio::test]
async fn whitespace_ingest_performs_zero_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;
    let embedder = Arc::new(VocabEmbedder::new());
    let p = pipeline(embedder.clone(), Arc::new(EchoGenerator::new()), store.clone());

    let state = p
        .run(PipelineRequest::Ingest {
            input: "   \n\t ".to_string(),
            source: "inline".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(state.chunks.as_deref(), Some(&[][..]));
    assert_eq!(state.stored, Some(0));
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn empty_question_short_circuits_without_service_calls() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;
    let embedder = Arc::new(VocabEmbedder::new());
    let generator = Arc::new(EchoGenerator::new());
    let p = pipeline(embedder.clone(), generator.clone(), store);

    let state = p
        .run(PipelineRequest::Query {
            question: "   ".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(state.retrieved_chunks.as_deref(), Some(&[][..]));
    assert_eq!(state.answer.as_deref(), Some(""));
    assert!(state.failure.is_none());
    assert_eq!(embedder.call_count(), 0);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn store_failure_degrades_instead_of_erroring() {
    let generator = Arc::new(EchoGenerator::new());
    let p = pipeline(
        Arc::new(VocabEmbedder::new()),
        generator.clone(),
        Arc::new(FailingStore),
    );

    let state = p
        .run(PipelineRequest::Query {
            question: "What does Plan A cover?".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(state.retrieved_chunks.as_deref(), Some(&[][..]));
    assert_eq!(state.answer.as_deref(), Some(""));
    assert!(state.failure.unwrap().contains("retrieval failed"));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn embedding_failure_degrades_instead_of_erroring() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;
    let p = pipeline(
        Arc::new(FailingEmbedder),
        Arc::new(EchoGenerator::new()),
        store,
    );

    let state = p
        .run(PipelineRequest::Query {
            question: "What does Plan A cover?".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(state.retrieved_chunks.as_deref(), Some(&[][..]));
    assert_eq!(state.answer.as_deref(), Some(""));
    assert!(state.failure.unwrap().contains("query embedding failed"));
}

#[tokio::test]
async fn ingest_embedding_failure_propagates_to_caller() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;
    let p = pipeline(
        Arc::new(FailingEmbedder),
        Arc::new(EchoGenerator::new()),
        store.clone(),
    );

    let result = p
        .run(PipelineRequest::Ingest {
            input: DOC.to_string(),
            source: "inline".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn query_ranks_matching_topic_first_and_answers_from_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;
    let embedder: Arc<dyn Embedder> = Arc::new(VocabEmbedder::new());
    let p = pipeline(embedder.clone(), Arc::new(EchoGenerator::new()), store.clone());

    p.run(PipelineRequest::Ingest {
        input: DOC.to_string(),
        source: "inline".to_string(),
    })
    .await
    .unwrap();

    let state = p
        .run(PipelineRequest::Query {
            question: "What does Plan A cover?".to_string(),
        })
        .await
        .unwrap();

    let retrieved = state.retrieved_chunks.unwrap();
    assert!(!retrieved.is_empty());
    assert_eq!(retrieved[0], "Plan A covers dental.");

    let answer = state.answer.unwrap();
    assert!(answer.contains("dental"));
    assert!(!answer.contains("vision"));
    assert!(state.failure.is_none());
}
