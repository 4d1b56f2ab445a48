//! Core data models for papers, search and extraction.

mod extraction;
mod paper;
mod search;

pub use extraction::{ContentSource, ExtractionResult};
pub use paper::{join_authors, ArxivPaper, AuthorEntry, PaperMetadata};
pub use search::{SearchQuery, SearchResults};
