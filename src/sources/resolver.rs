//! Paper identifier resolution.
//!
//! Pure string work, no network. Accepts either a bare ID (`2403.15137v1`)
//! or a URL whose last path segment is the ID.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use super::PaperError;

/// Path segments that precede an ID in arXiv URLs
const ROUTE_SEGMENTS: [&str; 3] = ["abs", "pdf", "html"];

fn version_suffix() -> &'static Regex {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    VERSION.get_or_init(|| Regex::new(r"v\d+$").expect("valid version regex"))
}

/// Remove a trailing `vN` version suffix
pub fn strip_version(paper_id: &str) -> &str {
    match version_suffix().find(paper_id) {
        Some(m) => &paper_id[..m.start()],
        None => paper_id,
    }
}

/// Canonical ID and source URLs for one paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaper {
    /// ID as supplied, version suffix included
    pub paper_id: String,

    /// HTML rendering (version suffix stripped)
    pub html_url: String,

    pub pdf_url: String,
}

/// Derives paper IDs and upstream URLs from user input
#[derive(Debug, Clone)]
pub struct SourceResolver {
    base_url: String,
}

impl SourceResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an identifier to its paper ID, HTML URL and PDF URL
    pub fn resolve(&self, identifier: &str) -> Result<ResolvedPaper, PaperError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(PaperError::Resolution("empty identifier".to_string()));
        }

        let (paper_id, pdf_url) = if is_url(identifier) {
            self.resolve_url(identifier)?
        } else {
            (
                identifier.to_string(),
                format!("{}/pdf/{}.pdf", self.base_url, identifier),
            )
        };

        Ok(ResolvedPaper {
            html_url: self.html_url(&paper_id),
            paper_id,
            pdf_url,
        })
    }

    /// PDF URL only
    pub fn pdf_url(&self, identifier: &str) -> Result<String, PaperError> {
        Ok(self.resolve(identifier)?.pdf_url)
    }

    /// HTML rendering URL for a paper ID
    pub fn html_url(&self, paper_id: &str) -> String {
        format!("{}/html/{}", self.base_url, strip_version(paper_id))
    }

    fn resolve_url(&self, input: &str) -> Result<(String, String), PaperError> {
        let url = Url::parse(input)
            .map_err(|e| PaperError::Resolution(format!("{}: {}", input, e)))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let last: &str = segments
            .last()
            .copied()
            .ok_or_else(|| PaperError::Resolution(format!("no paper ID in {}", input)))?;
        let paper_id = last.strip_suffix(".pdf").unwrap_or(last);
        if paper_id.is_empty() {
            return Err(PaperError::Resolution(format!("no paper ID in {}", input)));
        }

        let route = segments
            .iter()
            .position(|seg| ROUTE_SEGMENTS.contains(seg))
            .filter(|&pos| pos + 1 < segments.len());

        let pdf_url = match route {
            Some(pos) => {
                let mut path: Vec<&str> = segments[..pos].to_vec();
                path.push("pdf");
                path.extend_from_slice(&segments[pos + 1..]);
                let path = path.join("/");
                let path = path.strip_suffix(".pdf").unwrap_or(&path);
                format!("{}/{}.pdf", origin(&url), path)
            }
            // Unknown URL shape: fall back to the canonical PDF route
            None => format!("{}/pdf/{}.pdf", self.base_url, paper_id),
        };

        Ok((paper_id.to_string(), pdf_url))
    }
}

fn is_url(identifier: &str) -> bool {
    identifier.starts_with("http://") || identifier.starts_with("https://")
}

fn origin(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}
