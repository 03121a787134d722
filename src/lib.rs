//! Document Q&A backend: ingest PDFs into a sentence-chunked vector store
//! and answer questions over the stored chunks with a hosted LLM.

pub mod chunker;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod eval;
pub mod extract;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod state;
pub mod store;
