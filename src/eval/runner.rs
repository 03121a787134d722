//! Dataset loading and evaluation driving.

use std::path::Path;

use serde::Deserialize;

use crate::errors::ApiError;
use crate::llm::{self, Generator};
use crate::pipeline::{Pipeline, PipelineRequest};

use super::judge::{
    grade_correctness, grade_groundedness, grade_relevance, grade_retrieval_relevance, Grade,
};

/// One dataset record: a question and its reference answer.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalRecord {
    pub question: String,
    pub answer: String,
}

/// Grades for one evaluated question.
#[derive(Debug)]
pub struct CaseResult {
    pub question: String,
    pub answer: String,
    pub retrieved: Vec<String>,
    pub correctness: Grade,
    pub relevance: Grade,
    pub groundedness: Grade,
    pub retrieval_relevance: Grade,
}

#[derive(Debug, Default)]
pub struct EvalReport {
    pub cases: Vec<CaseResult>,
}

impl EvalReport {
    /// Per-axis pass rates in [0, 1]; order: correctness, relevance,
    /// groundedness, retrieval relevance.
    pub fn pass_rates(&self) -> [f64; 4] {
        let total = self.cases.len();
        if total == 0 {
            return [0.0; 4];
        }
        let count = |select: fn(&CaseResult) -> bool| {
            self.cases.iter().filter(|c| select(c)).count() as f64 / total as f64
        };
        [
            count(|c| c.correctness.verdict),
            count(|c| c.relevance.verdict),
            count(|c| c.groundedness.verdict),
            count(|c| c.retrieval_relevance.verdict),
        ]
    }
}

/// Read a JSONL dataset of `{"question", "answer"}` records. Blank lines
/// are skipped; a malformed line is an error.
pub fn load_dataset(path: &Path) -> Result<Vec<EvalRecord>, ApiError> {
    let content = std::fs::read_to_string(path).map_err(ApiError::internal)?;

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<EvalRecord>(line).map_err(ApiError::internal))
        .collect()
}

/// Run every record through the query branch and grade the four axes
/// independently.
pub async fn run_eval(
    pipeline: &Pipeline,
    grader: &dyn Generator,
    records: &[EvalRecord],
) -> Result<EvalReport, ApiError> {
    let mut report = EvalReport::default();

    for record in records {
        let state = pipeline
            .run(PipelineRequest::Query {
                question: record.question.clone(),
            })
            .await?;

        let answer = state.answer.unwrap_or_default();
        let retrieved = state.retrieved_chunks.unwrap_or_default();
        let facts = llm::join_context(&retrieved);

        let correctness =
            grade_correctness(grader, &record.question, &record.answer, &answer).await?;
        let relevance = grade_relevance(grader, &record.question, &answer).await?;
        let groundedness = grade_groundedness(grader, &facts, &answer).await?;
        let retrieval_relevance =
            grade_retrieval_relevance(grader, &record.question, &facts).await?;

        tracing::info!(
            "graded '{}': correct={} relevant={} grounded={} retrieval_relevant={}",
            record.question,
            correctness.verdict,
            relevance.verdict,
            groundedness.verdict,
            retrieval_relevance.verdict
        );

        report.cases.push(CaseResult {
            question: record.question.clone(),
            answer,
            retrieved,
            correctness,
            relevance,
            groundedness,
            retrieval_relevance,
        });
    }

    Ok(report)
}
