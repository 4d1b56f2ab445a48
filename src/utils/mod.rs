//! Utility modules supporting the extraction pipeline.
//!
//! - [`HttpClient`]: shared reqwest client with per-request timeouts
//! - [`PdfTextExtractor`]: page-by-page PDF text extraction
//! - [`TempPdf`]: scoped temporary PDF file, removed on drop
//! - [`normalize_whitespace`], [`truncate_chars`], [`ensure_min_length`]: text helpers
//!
//! # Scoped temporary files
//!
//! ```rust,no_run
//! use arxiv_paper_mcp::utils::TempPdf;
//!
//! # fn main() -> std::io::Result<()> {
//! let (artifact, _file) = TempPdf::create_in(&std::env::temp_dir())?;
//! let path = artifact.path().to_path_buf();
//! drop(artifact);
//! assert!(!path.exists());
//! # Ok(())
//! # }
//! ```

mod http;
pub(crate) mod pdf;
mod temp;
mod text;

pub use http::HttpClient;
pub use pdf::{parse_items, PdfExtractError, PdfItem, PdfTextExtractor};
pub use temp::TempPdf;
pub use text::{ensure_min_length, normalize_whitespace, truncate_chars};
