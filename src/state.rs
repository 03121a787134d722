use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::{AppConfig, AppPaths};
use crate::embedding::GeminiEmbedder;
use crate::llm::GeminiGenerator;
use crate::pipeline::Pipeline;
use crate::store::{NoopVectorStore, SqliteVectorStore, VectorStore};

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<Pipeline>,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let config = Arc::new(AppConfig::from_env());

        let embedder = Arc::new(GeminiEmbedder::new(
            config.gemini_api_key.clone(),
            config.embedding_model.clone(),
        ));
        let generator = Arc::new(GeminiGenerator::new(
            config.gemini_api_key.clone(),
            config.generation_model.clone(),
        ));

        let store: Arc<dyn VectorStore> = if config.skip_db {
            tracing::info!("vector store bypassed (DOCQA_SKIP_DB)");
            Arc::new(NoopVectorStore)
        } else {
            Arc::new(SqliteVectorStore::new(paths.db_path.clone()).await?)
        };

        let pipeline = Arc::new(Pipeline::new(embedder, generator, store, config.top_k));
        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            config,
            pipeline,
            started_at,
        }))
    }
}
