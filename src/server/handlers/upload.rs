use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::errors::ApiError;
use crate::pipeline::PipelineRequest;
use crate::state::AppState;

/// Accepts a multipart PDF upload, spools it to the upload directory and
/// runs the ingest branch on it. Failures here surface as 500 with the
/// error detail; this is the one path that does not degrade silently.
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut saved: Option<(std::path::PathBuf, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::internal)? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let bytes = field.bytes().await.map_err(ApiError::internal)?;

        let path = state
            .paths
            .upload_dir
            .join(format!("{}.pdf", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(ApiError::internal)?;

        saved = Some((path, original_name));
        break;
    }

    let (path, original_name) =
        saved.ok_or_else(|| ApiError::BadRequest("missing 'file' field".to_string()))?;

    let request = PipelineRequest::Ingest {
        input: path.to_string_lossy().to_string(),
        source: original_name.clone(),
    };
    let result = state.pipeline.run(request).await?;

    let chunk_count = result.chunks.as_ref().map(Vec::len).unwrap_or(0);
    let stored = result.stored.unwrap_or(0);
    tracing::info!("ingested {}: {} chunks, {} stored", original_name, chunk_count, stored);

    Ok(Json(json!({
        "message": format!("ingested {}", original_name),
        "result": {
            "chunks": chunk_count,
            "stored": stored,
        },
    })))
}
