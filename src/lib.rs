//! # arXiv Paper MCP
//!
//! A Model Context Protocol (MCP) server that searches arXiv and extracts the
//! full text of papers, preferring arXiv's HTML rendering and falling back to
//! the PDF.
//!
//! ## Architecture
//!
//! - [`models`]: Paper metadata, search results and extraction results
//! - [`sources`]: Identifier resolution, HTML/PDF fetchers and the content assembler
//! - [`mcp`]: Tool registry and the pmcp server
//! - [`utils`]: HTTP client, PDF text extraction, scoped temp files
//! - [`config`]: Configuration management

pub mod config;
pub mod mcp;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use models::{ContentSource, ExtractionResult, PaperMetadata};
pub use sources::{ContentAssembler, PaperError, SourceResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
