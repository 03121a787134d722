//! Offline evaluation harness.
//!
//! Feeds a fixed `(question, reference answer)` dataset through the query
//! branch and grades each output along four independent LLM-as-judge axes.
//! There is no aggregate score; each axis stands alone.

mod judge;
mod runner;

pub use judge::{
    grade_correctness, grade_groundedness, grade_relevance, grade_retrieval_relevance, Grade,
};
pub use runner::{load_dataset, run_eval, CaseResult, EvalRecord, EvalReport};
