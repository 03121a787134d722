use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{Embedder, EmbeddingTask};
use crate::errors::ApiError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Embedder backed by the Gemini `embedContent` endpoint.
#[derive(Clone)]
pub struct GeminiEmbedder {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), api_key, model)
    }

    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Vec<f32>, ApiError> {
        let url = format!("{}/models/{}:embedContent", self.base_url, self.model);

        let body = json!({
            "model": format!("models/{}", self.model),
            "content": { "parts": [ { "text": text } ] },
            "taskType": task.as_api_str(),
        });

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "embedding request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;

        let values = payload["embedding"]["values"]
            .as_array()
            .ok_or_else(|| ApiError::Internal("embedding response missing values".to_string()))?;

        Ok(values
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect())
    }
}
