//! Document text extraction.
//!
//! The ingest input is either a path to a PDF on disk or the document text
//! itself. Extraction never fails: anything that cannot be read as a PDF is
//! treated as raw text.

use std::path::Path;

/// Extract raw text from the ingest input.
///
/// If the trimmed input names an existing file, its text is extracted with
/// `pdf_extract`; page separators (form feeds) are normalized to blank
/// lines. On any extraction failure the input itself is returned as text.
pub fn extract_text(input: &str) -> String {
    let candidate = input.trim();
    if candidate.is_empty() {
        return String::new();
    }

    let path = Path::new(candidate);
    if !path.is_file() {
        return input.to_string();
    }

    match pdf_extract::extract_text(path) {
        Ok(text) => join_pages(&text),
        Err(err) => {
            tracing::warn!("PDF extraction failed for {}: {}", path.display(), err);
            input.to_string()
        }
    }
}

/// pdf-extract separates pages with form feeds. Join non-empty pages with a
/// blank line so the chunker sees one continuous document.
fn join_pages(text: &str) -> String {
    text.split('\x0c')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_passes_through() {
        let input = "Plan A covers dental. Plan B covers vision.";
        assert_eq!(extract_text(input), input);
    }

    #[test]
    fn missing_path_falls_back_to_raw_input() {
        let input = "/no/such/file.pdf";
        assert_eq!(extract_text(input), input);
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert_eq!(extract_text("   "), "");
    }

    #[test]
    fn unparseable_file_falls_back_to_raw_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&path, b"plain bytes, no PDF header").unwrap();

        let input = path.to_string_lossy().to_string();
        assert_eq!(extract_text(&input), input);
    }

    #[test]
    fn pages_join_with_blank_lines() {
        assert_eq!(join_pages("one\x0c\x0c two "), "one\n\ntwo");
    }
}
