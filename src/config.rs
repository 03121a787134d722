//! Process configuration.
//!
//! All environment variables are read exactly once, at startup, into an
//! `AppConfig` that is passed by reference into each component. Nothing
//! else in the crate touches the environment.

use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        let log_dir = data_dir.join("logs");
        let db_path = env::var("DOCQA_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("docqa.db"));
        let upload_dir = data_dir.join("uploads");

        for dir in [&data_dir, &log_dir, &upload_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            log_dir,
            db_path,
            upload_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("DOCQA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if cfg!(debug_assertions) {
        return env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    if cfg!(target_os = "windows") {
        let base = env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string()));
        return PathBuf::from(base).join("docqa");
    }

    if cfg!(target_os = "macos") {
        return home_dir()
            .join("Library")
            .join("Application Support")
            .join("docqa");
    }

    let xdg = env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        home_dir()
            .join(".local/share")
            .to_string_lossy()
            .to_string()
    });
    PathBuf::from(xdg).join("docqa")
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Runtime configuration, resolved from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the hosted embedding/generation service.
    pub gemini_api_key: String,
    /// Embedding model name, without the `models/` prefix.
    pub embedding_model: String,
    /// Generation model name.
    pub generation_model: String,
    /// Number of chunks returned by nearest-neighbor retrieval.
    pub top_k: usize,
    /// Skip the vector store entirely (evaluation runs without a database).
    pub skip_db: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let embedding_model =
            env::var("DOCQA_EMBEDDING_MODEL").unwrap_or_else(|_| "embedding-001".to_string());
        let generation_model =
            env::var("DOCQA_GENERATION_MODEL").unwrap_or_else(|_| "gemini-2.5-pro".to_string());
        let top_k = env::var("DOCQA_TOP_K")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|k| *k > 0)
            .unwrap_or(3);
        let skip_db = env::var("DOCQA_SKIP_DB")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        AppConfig {
            gemini_api_key,
            embedding_model,
            generation_model,
            top_k,
            skip_db,
        }
    }
}
