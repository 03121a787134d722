use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::pipeline::PipelineRequest;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(rename = "topChunks")]
    pub top_chunks: Vec<String>,
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PipelineRequest::Query {
        question: payload.question,
    };

    let result = state.pipeline.run(request).await?;

    if let Some(reason) = &result.failure {
        tracing::warn!("ask degraded: {}", reason);
    }

    Ok(Json(AskResponse {
        answer: result.answer.unwrap_or_default(),
        top_chunks: result.retrieved_chunks.unwrap_or_default(),
    }))
}
