// Document extraction — turns .docx/.pptx files into topic blocks and
// question units.
//
// Format is decided by file extension alone. The readers (docx, pptx) handle
// the ZIP + XML plumbing; the segmenters (blocks, questions) hold the actual
// splitting rules and are pure functions over already-read structures.

pub mod blocks;
pub mod docx;
pub mod pptx;
pub mod questions;

use std::path::Path;

use tracing::warn;

use crate::error::Error;

/// A (heading, content) unit extracted from a syllabus-like document.
///
/// `heading` is the verbatim trimmed heading text; `content` is the
/// newline-joined trimmed body text under that heading (empty for a titled
/// slide with no other text).
#[derive(Debug, Clone, PartialEq)]
pub struct TopicBlock {
    pub heading: String,
    pub content: String,
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

fn file_id(path: &Path) -> String {
    path.display().to_string()
}

/// Extract topic blocks from a syllabus document (.docx or .pptx).
///
/// Blocks come back in document order. A failure here invalidates the whole
/// document's contribution — the caller decides whether to continue with
/// other files in the batch.
pub fn extract_topic_blocks(path: &Path) -> Result<Vec<TopicBlock>, Error> {
    let wrap = |source: anyhow::Error| Error::Extraction {
        file: file_id(path),
        source,
    };

    match extension_of(path).as_deref() {
        Some("docx") => {
            let paragraphs = docx::read_paragraphs(path).map_err(wrap)?;
            Ok(blocks::segment_outline(&paragraphs))
        }
        Some("pptx") => {
            let slides = pptx::read_slides(path).map_err(wrap)?;
            Ok(blocks::segment_slides(&slides))
        }
        _ => Err(Error::UnsupportedFormat {
            file: file_id(path),
            expected: ".docx or .pptx",
        }),
    }
}

/// Extract labeled question units from a quiz document (.docx only).
///
/// The wrong extension is surfaced as `UnsupportedFormat`; a document that
/// is the right format but fails to parse degrades to an empty list with a
/// warning, so one malformed quiz file does not abort a multi-file batch.
pub fn extract_questions(path: &Path) -> Result<Vec<String>, Error> {
    if extension_of(path).as_deref() != Some("docx") {
        return Err(Error::UnsupportedFormat {
            file: file_id(path),
            expected: ".docx",
        });
    }

    let paragraphs = match docx::read_paragraphs(path) {
        Ok(paragraphs) => paragraphs,
        Err(e) => {
            warn!(
                file = %path.display(),
                error = %format!("{e:#}"),
                "could not read quiz document, continuing with no questions"
            );
            return Ok(Vec::new());
        }
    };

    let full_text = paragraphs
        .iter()
        .map(|p| p.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(questions::segment_questions(&full_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn wrong_extension_is_unsupported_for_blocks() {
        let err = extract_topic_blocks(&PathBuf::from("notes.pdf")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn pptx_is_unsupported_for_questions() {
        let err = extract_questions(&PathBuf::from("quiz.pptx")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        // A .DOCX that doesn't exist gets past the format check and fails
        // as an extraction error instead.
        let err = extract_topic_blocks(&PathBuf::from("missing.DOCX")).unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
    }
}
