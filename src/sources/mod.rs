//! Upstream sources and the content extraction pipeline.
//!
//! Leaves first:
//!
//! - [`SourceResolver`]: identifier to paper ID, HTML URL and PDF URL
//! - [`HtmlFetcher`] / [`HtmlTextExtractor`]: the rendered HTML paper
//! - [`PdfFetcher`]: streams the PDF into a scoped temporary file
//! - [`ContentAssembler`]: HTML first, PDF fallback, metadata header
//! - [`ArxivClient`]: the search API and the recent-papers listing
//!
//! PDF text itself is read by [`crate::utils::PdfTextExtractor`].

mod arxiv;
mod assembler;
mod html;
mod pdf;
mod resolver;

pub use arxiv::ArxivClient;
pub use assembler::{format_content, ContentAssembler};
pub use html::{HtmlFetcher, HtmlTextExtractor};
pub use pdf::PdfFetcher;
pub use resolver::{ResolvedPaper, SourceResolver};

/// Errors raised while resolving, fetching or extracting a paper
#[derive(Debug, thiserror::Error)]
pub enum PaperError {
    /// The identifier could not be turned into a paper ID
    #[error("Invalid paper identifier: {0}")]
    Resolution(String),

    /// The HTML rendering could not be fetched or failed validation
    #[error("HTML fetch failed: {0}")]
    Fetch(String),

    /// The PDF could not be downloaded or written to disk
    #[error("PDF download failed: {0}")]
    Download(String),

    /// No usable content could be extracted
    #[error("Content extraction failed: {0}")]
    Extraction(String),

    /// Every source was tried; carries the last failure in its message
    #[error("Paper content unavailable: {0}")]
    UpstreamUnavailable(Box<PaperError>),

    /// Invalid tool arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error (search and listing)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the API
    #[error("API error: {0}")]
    Api(String),

    /// Malformed API response
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PaperError {
    fn from(err: serde_json::Error) -> Self {
        PaperError::InvalidRequest(err.to_string())
    }
}
