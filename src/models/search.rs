//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::paper::{join_authors, ArxivPaper};
use crate::utils::truncate_chars;

/// Characters of the summary shown per listing entry
const SUMMARY_EXCERPT_CHARS: usize = 300;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query, matched against all fields
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 5,
        }
    }

    /// Set the maximum number of results
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Search results from the arXiv API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Total matches reported by the API (not just the returned page)
    pub total_results: u64,

    pub papers: Vec<ArxivPaper>,
}

impl SearchResults {
    /// Render as the numbered listing handed back to the calling agent
    pub fn render(&self) -> String {
        let entries = self
            .papers
            .iter()
            .enumerate()
            .map(|(index, paper)| {
                format!(
                    "{}. **{}**\n   ID: {}\n   Published: {}\n   Authors: {}\n   Summary: {}...\n   URL: {}\n",
                    index + 1,
                    paper.title,
                    paper.id,
                    paper.published,
                    join_authors(&paper.authors),
                    truncate_chars(&paper.summary, SUMMARY_EXCERPT_CHARS),
                    paper.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Found {} papers (total {}):\n\n{}",
            self.papers.len(),
            self.total_results,
            entries
        )
    }
}
