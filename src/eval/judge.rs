//! LLM-as-judge graders.
//!
//! Each grader sends one instruction + payload prompt and expects a JSON
//! object with an `explanation` string and a boolean label. Model output
//! that cannot be parsed counts as a failing grade, with the raw text kept
//! as the explanation.

use serde_json::Value;

use crate::errors::ApiError;
use crate::llm::Generator;

/// A structured boolean-plus-rationale judgment.
#[derive(Debug, Clone)]
pub struct Grade {
    pub verdict: bool,
    pub explanation: String,
}

const CORRECTNESS_INSTRUCTIONS: &str = "You are a teacher grading a quiz. \
You will be given a QUESTION, the GROUND TRUTH (correct) ANSWER, and the STUDENT ANSWER. \
Grade ONLY factual accuracy vs the ground truth. Extra correct info is OK; no conflicts. \
Return correct=true only if it fully matches without contradictions.";

const RELEVANCE_INSTRUCTIONS: &str = "You are a teacher grading a quiz. \
You will be given a QUESTION and a STUDENT ANSWER. \
Return relevant=true only if the answer addresses the question and helps the user.";

const GROUNDED_INSTRUCTIONS: &str = "You are a teacher grading groundedness. \
You will be given FACTS (retrieved context) and a STUDENT ANSWER. \
Return grounded=true only if all claims are supported by the FACTS (no hallucinations).";

const RETRIEVAL_RELEVANCE_INSTRUCTIONS: &str = "You are grading if the retrieved FACTS are \
relevant to the QUESTION. If ANY portion is semantically related, consider them relevant. \
Minor off-topic content is OK.";

/// Factual correctness of the answer against a reference answer.
pub async fn grade_correctness(
    generator: &dyn Generator,
    question: &str,
    reference: &str,
    answer: &str,
) -> Result<Grade, ApiError> {
    let payload = format!(
        "QUESTION: {}\nGROUND TRUTH ANSWER: {}\nSTUDENT ANSWER: {}",
        question, reference, answer
    );
    judge(generator, CORRECTNESS_INSTRUCTIONS, &payload, "correct").await
}

/// Relevance of the answer to the question.
pub async fn grade_relevance(
    generator: &dyn Generator,
    question: &str,
    answer: &str,
) -> Result<Grade, ApiError> {
    let payload = format!("QUESTION: {}\nSTUDENT ANSWER: {}", question, answer);
    judge(generator, RELEVANCE_INSTRUCTIONS, &payload, "relevant").await
}

/// Groundedness of the answer in the retrieved context.
pub async fn grade_groundedness(
    generator: &dyn Generator,
    facts: &str,
    answer: &str,
) -> Result<Grade, ApiError> {
    let payload = format!("FACTS:\n{}\n\nSTUDENT ANSWER:\n{}", facts, answer);
    judge(generator, GROUNDED_INSTRUCTIONS, &payload, "grounded").await
}

/// Relevance of the retrieved context to the question.
pub async fn grade_retrieval_relevance(
    generator: &dyn Generator,
    question: &str,
    facts: &str,
) -> Result<Grade, ApiError> {
    let payload = format!("QUESTION:\n{}\n\nFACTS:\n{}", question, facts);
    judge(generator, RETRIEVAL_RELEVANCE_INSTRUCTIONS, &payload, "relevant").await
}

async fn judge(
    generator: &dyn Generator,
    instructions: &str,
    payload: &str,
    label_key: &str,
) -> Result<Grade, ApiError> {
    let prompt = format!(
        "{}\n\n{}\n\nRespond with a JSON object only, no prose around it: \
         {{\"explanation\": \"<your reasoning>\", \"{}\": <true or false>}}",
        instructions, payload, label_key
    );

    let raw = generator.generate(&prompt).await?;
    Ok(parse_grade(&raw, label_key))
}

/// Parse a grade from model output, tolerating markdown code fences.
fn parse_grade(raw: &str, label_key: &str) -> Grade {
    let stripped = strip_code_fence(raw);

    match serde_json::from_str::<Value>(stripped) {
        Ok(value) => {
            let verdict = value
                .get(label_key)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let explanation = value
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or(stripped)
                .to_string();
            Grade {
                verdict,
                explanation,
            }
        }
        Err(_) => Grade {
            verdict: false,
            explanation: raw.trim().to_string(),
        },
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json_grade() {
        let grade = parse_grade(r#"{"explanation": "matches", "correct": true}"#, "correct");
        assert!(grade.verdict);
        assert_eq!(grade.explanation, "matches");
    }

    #[test]
    fn parses_fenced_json_grade() {
        let raw = "```json\n{\"explanation\": \"off topic\", \"relevant\": false}\n```";
        let grade = parse_grade(raw, "relevant");
        assert!(!grade.verdict);
        assert_eq!(grade.explanation, "off topic");
    }

    #[test]
    fn unparseable_output_fails_with_raw_explanation() {
        let grade = parse_grade("I think the answer is fine.", "grounded");
        assert!(!grade.verdict);
        assert_eq!(grade.explanation, "I think the answer is fine.");
    }

    #[test]
    fn missing_label_key_fails() {
        let grade = parse_grade(r#"{"explanation": "hmm"}"#, "correct");
        assert!(!grade.verdict);
    }
}
