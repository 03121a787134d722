//! Answer generation.
//!
//! `Generator` abstracts the hosted completion API; `GeminiGenerator` is
//! the production implementation. The prompt helpers here define the only
//! prompt the query branch ever sends: answer strictly from the retrieved
//! context, admit ignorance otherwise.

mod gemini;

pub use gemini::GeminiGenerator;

use async_trait::async_trait;

use crate::errors::ApiError;

#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a completion for the prompt. An empty string is a valid
    /// result (the model had nothing usable to say).
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Join retrieved chunk texts into a context block, order preserved,
/// separated by blank lines.
pub fn join_context(chunks: &[String]) -> String {
    chunks.join("\n\n")
}

/// Build the fixed question-answering prompt.
pub fn build_answer_prompt(question: &str, context: &str) -> String {
    format!(
        "Answer the question strictly from the context below. \
         If the context is insufficient to answer, say you don't know.\n\n\
         Context:\n{}\n\nQuestion: {}\nAnswer:",
        context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_preserves_order_with_blank_line_separators() {
        let chunks = vec!["first".to_string(), "second".to_string()];
        assert_eq!(join_context(&chunks), "first\n\nsecond");
    }

    #[test]
    fn prompt_contains_question_and_context() {
        let prompt = build_answer_prompt("What is covered?", "Plan A covers dental.");
        assert!(prompt.contains("Plan A covers dental."));
        assert!(prompt.contains("Question: What is covered?"));
        assert!(prompt.contains("strictly from the context"));
    }
}
