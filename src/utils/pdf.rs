//! PDF text extraction utilities.
//!
//! The document is walked page by page with `lopdf`, emitting a stream of
//! [`PdfItem`]s in document order. Only text items end up in the extracted
//! body; page markers let callers observe progress.

use std::path::{Path, PathBuf};

use lopdf::Document;
use thiserror::Error;

use crate::sources::PaperError;
use crate::utils::{ensure_min_length, normalize_whitespace};

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("PDF parse failed: {0}")]
    Parse(String),

    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

impl From<PdfExtractError> for PaperError {
    fn from(err: PdfExtractError) -> Self {
        PaperError::Extraction(err.to_string())
    }
}

/// A structural item read out of a PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfItem {
    /// Start of a page (1-based)
    Page(u32),
    /// A run of text as laid out on the page
    Text(String),
}

/// Walk `path` and hand every item to `on_item`, in document order.
///
/// Stops at the first page the parser cannot decode.
pub fn parse_items<F>(path: &Path, mut on_item: F) -> Result<(), PdfExtractError>
where
    F: FnMut(PdfItem),
{
    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let document = Document::load(path).map_err(|e| PdfExtractError::Parse(e.to_string()))?;

    for number in document.get_pages().into_keys() {
        on_item(PdfItem::Page(number));

        let page_text = document
            .extract_text(&[number])
            .map_err(|e| PdfExtractError::Parse(format!("page {}: {}", number, e)))?;

        page_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .for_each(|line| on_item(PdfItem::Text(line.to_string())));
    }

    Ok(())
}

/// Turns a downloaded PDF into normalized body text
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    min_chars: usize,
}

impl PdfTextExtractor {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Extract text synchronously
    pub fn extract_blocking(&self, path: &Path) -> Result<String, PaperError> {
        let mut texts = Vec::new();
        let mut pages = 0u32;

        parse_items(path, |item| match item {
            PdfItem::Page(_) => pages += 1,
            PdfItem::Text(text) => texts.push(text),
        })?;

        tracing::debug!(
            "Read {} text items from {} pages of {}",
            texts.len(),
            pages,
            path.display()
        );

        let text = normalize_whitespace(&texts.join(" "));
        ensure_min_length(text, self.min_chars, "PDF")
    }

    /// Extract text on the blocking thread pool
    pub async fn extract(&self, path: &Path) -> Result<String, PaperError> {
        let extractor = self.clone();
        let path: PathBuf = path.to_path_buf();

        tokio::task::spawn_blocking(move || extractor.extract_blocking(&path))
            .await
            .map_err(|e| PdfExtractError::Task(e.to_string()))?
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const LINE_ONE: &str = "Attention mechanisms let models weigh the relevance of inputs.";
    const LINE_TWO: &str = "We study their behaviour on long documents and report results.";

    fn write_pdf(dir: &Path, pages: &[&[&str]]) -> PathBuf {
        let path = dir.join("paper.pdf");
        std::fs::write(&path, fixtures::pdf_bytes(pages)).unwrap();
        path
    }

    #[test]
    fn test_extract_nonexistent_file() {
        let result = PdfTextExtractor::new(100).extract_blocking(Path::new("/nonexistent/file.pdf"));
        assert!(matches!(result, Err(PaperError::Extraction(_))));
    }

    #[test]
    fn test_parse_items_in_document_order() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), &[&[LINE_ONE], &[LINE_TWO]]);

        let mut items = Vec::new();
        parse_items(&path, |item| items.push(item)).unwrap();

        assert_eq!(items.first(), Some(&PdfItem::Page(1)));
        let second_page = items.iter().position(|i| *i == PdfItem::Page(2)).unwrap();
        let texts_before: String = items[..second_page]
            .iter()
            .filter_map(|i| match i {
                PdfItem::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts_before.contains("Attention mechanisms"));
    }

    #[test]
    fn test_extract_normalizes_text() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), &[&[LINE_ONE, LINE_TWO]]);

        let text = PdfTextExtractor::new(100).extract_blocking(&path).unwrap();

        assert!(text.contains("Attention mechanisms let models weigh"));
        assert!(text.contains("long documents"));
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_extract_rejects_short_text() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), &[&["Too short."]]);

        let err = PdfTextExtractor::new(100).extract_blocking(&path).unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"<html>not a pdf</html>").unwrap();

        let result = PdfTextExtractor::new(100).extract_blocking(&path);
        assert!(matches!(result, Err(PaperError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_extract_async() {
        let dir = tempdir().unwrap();
        let path = write_pdf(dir.path(), &[&[LINE_ONE], &[LINE_TWO]]);

        let text = PdfTextExtractor::new(100).extract(&path).await.unwrap();
        assert!(text.contains("Attention"));
        assert!(text.contains("report results"));
    }
}
