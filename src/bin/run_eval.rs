//! Offline evaluation entry point.
//!
//! Usage: `run_eval [dataset.jsonl]`. Runs every dataset question through
//! the query branch and grades the four judge axes. Set `DOCQA_SKIP_DB=1`
//! to evaluate without a populated vector store.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use docqa_backend::eval::{load_dataset, run_eval};
use docqa_backend::llm::GeminiGenerator;
use docqa_backend::logging;
use docqa_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize().await?;
    logging::init(&state.paths);

    let dataset_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("eval_dataset.jsonl"));

    let records = load_dataset(&dataset_path)?;
    tracing::info!(
        "evaluating {} records from {}",
        records.len(),
        dataset_path.display()
    );

    let grader = Arc::new(GeminiGenerator::new(
        state.config.gemini_api_key.clone(),
        state.config.generation_model.clone(),
    ));

    let report = run_eval(&state.pipeline, grader.as_ref(), &records).await?;

    let [correctness, relevance, groundedness, retrieval_relevance] = report.pass_rates();
    println!("cases:               {}", report.cases.len());
    println!("correctness:         {:.1}%", correctness * 100.0);
    println!("relevance:           {:.1}%", relevance * 100.0);
    println!("groundedness:        {:.1}%", groundedness * 100.0);
    println!("retrieval relevance: {:.1}%", retrieval_relevance * 100.0);

    for case in &report.cases {
        if !case.correctness.verdict {
            tracing::info!(
                "incorrect: '{}' -> '{}' ({})",
                case.question,
                case.answer,
                case.correctness.explanation
            );
        }
    }

    Ok(())
}
