//! Sentence-level chunking.
//!
//! Splits document text into sentence spans, the unit of retrieval. A
//! sentence ends at `.`, `!` or `?` followed by whitespace and an
//! uppercase letter, digit or opening quote, with guards for common
//! abbreviations and decimal numbers.

const ABBREVIATIONS: [&str; 12] = [
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "no", "vs", "etc", "approx",
];

/// Split text into trimmed, non-empty sentence spans.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn split_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for i in 0..chars.len() {
        let c = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if !is_boundary(&chars, start, i) {
            continue;
        }

        let span: String = chars[start..=i].iter().collect();
        let span = span.trim();
        if !span.is_empty() {
            sentences.push(span.to_string());
        }
        start = i + 1;
    }

    if start < chars.len() {
        let tail: String = chars[start..].iter().collect();
        let tail = tail.trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
    }

    sentences
}

fn is_boundary(chars: &[char], start: usize, end: usize) -> bool {
    // End of text always terminates the sentence.
    let Some(&next) = chars.get(end + 1) else {
        return true;
    };

    if !next.is_whitespace() {
        // "3.5" or "e.g" — punctuation embedded in a token.
        return false;
    }

    if chars[end] == '.' && ends_with_abbreviation(chars, start, end) {
        return false;
    }

    // Require a sentence-like start after the gap.
    chars[end + 1..]
        .iter()
        .find(|c| !c.is_whitespace())
        .map(|&c| c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '('))
        .unwrap_or(true)
}

fn ends_with_abbreviation(chars: &[char], start: usize, dot: usize) -> bool {
    let mut word_start = dot;
    while word_start > start && chars[word_start - 1].is_alphabetic() {
        word_start -= 1;
    }
    if word_start == dot {
        return false;
    }

    let word: String = chars[word_start..dot]
        .iter()
        .collect::<String>()
        .to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_sentences() {
        let chunks = split_sentences("Plan A covers dental. Plan B covers vision.");
        assert_eq!(
            chunks,
            vec!["Plan A covers dental.", "Plan B covers vision."]
        );
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
    }

    #[test]
    fn single_sentence_without_terminator() {
        assert_eq!(
            split_sentences("coverage limits apply"),
            vec!["coverage limits apply"]
        );
    }

    #[test]
    fn decimal_numbers_do_not_split() {
        let chunks = split_sentences("The deductible is 3.5 percent. Claims are online.");
        assert_eq!(
            chunks,
            vec!["The deductible is 3.5 percent.", "Claims are online."]
        );
    }

    #[test]
    fn abbreviations_do_not_split() {
        let chunks = split_sentences("Dr. Smith approved the claim. Payment follows.");
        assert_eq!(
            chunks,
            vec!["Dr. Smith approved the claim.", "Payment follows."]
        );
    }

    #[test]
    fn question_and_exclamation_terminate() {
        let chunks = split_sentences("Is vision covered? Yes! Dental too.");
        assert_eq!(chunks, vec!["Is vision covered?", "Yes!", "Dental too."]);
    }
}
