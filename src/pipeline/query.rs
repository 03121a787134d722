//! Query branch: retrieve -> answer.
//!
//! This branch never fails. External-call failures degrade to an empty
//! result with the reason recorded in `state.failure`; the worst outcome
//! is an empty answer, never an error surfaced to the caller.

use crate::embedding::EmbeddingTask;
use crate::llm;

use super::{Pipeline, PipelineState, StateUpdate};

impl Pipeline {
    pub(super) async fn run_query(&self, question: &str) -> PipelineState {
        let mut state = PipelineState::default();
        state.merge(StateUpdate {
            question: Some(question.to_string()),
            ..Default::default()
        });

        let trimmed = question.trim();
        if trimmed.is_empty() {
            // Short-circuit: no embedding or generation call happens.
            state.merge(StateUpdate {
                retrieved_chunks: Some(Vec::new()),
                answer: Some(String::new()),
                ..Default::default()
            });
            return state;
        }

        let retrieved = self.retrieve_step(trimmed).await;
        state.merge(retrieved);

        let answered = self.answer_step(&state, trimmed).await;
        state.merge(answered);

        state
    }

    /// Embed the question and fetch the nearest stored chunks. Any failure
    /// degrades to empty results with the reason recorded.
    async fn retrieve_step(&self, question: &str) -> StateUpdate {
        let query_embedding = match self.embedder().embed(question, EmbeddingTask::Query).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!("query embedding failed: {}", err);
                return degraded(format!("query embedding failed: {}", err));
            }
        };

        let hits = match self.store().query_nearest(&query_embedding, self.top_k()).await {
            Ok(hits) => hits,
            Err(err) => {
                tracing::warn!("retrieval failed: {}", err);
                return degraded(format!("retrieval failed: {}", err));
            }
        };

        StateUpdate {
            query_embedding: Some(query_embedding),
            retrieved_chunks: Some(hits.into_iter().map(|hit| hit.chunk.text).collect()),
            ..Default::default()
        }
    }

    /// Ask the generator to answer from the retrieved context. A recorded
    /// retrieval failure or a generator failure yields an empty answer.
    async fn answer_step(&self, state: &PipelineState, question: &str) -> StateUpdate {
        if state.failure.is_some() {
            return StateUpdate {
                answer: Some(String::new()),
                ..Default::default()
            };
        }

        let chunks = state.retrieved_chunks.as_deref().unwrap_or_default();
        let context = llm::join_context(chunks);
        let prompt = llm::build_answer_prompt(question, &context);

        match self.generator().generate(&prompt).await {
            Ok(text) => StateUpdate {
                answer: Some(text.trim().to_string()),
                ..Default::default()
            },
            Err(err) => {
                tracing::warn!("generation failed: {}", err);
                StateUpdate {
                    answer: Some(String::new()),
                    failure: Some(format!("generation failed: {}", err)),
                    ..Default::default()
                }
            }
        }
    }
}

fn degraded(reason: String) -> StateUpdate {
    StateUpdate {
        retrieved_chunks: Some(Vec::new()),
        failure: Some(reason),
        ..Default::default()
    }
}
