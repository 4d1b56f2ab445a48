//! HTML rendering of a paper: fetch with validity check, then text extraction.

use scraper::{Html, Selector};
use std::time::Duration;

use super::{PaperError, SourceResolver};
use crate::config::{ExtractionConfig, HttpConfig};
use crate::utils::{ensure_min_length, normalize_whitespace, HttpClient};

/// Fetches the HTML rendering of a paper.
///
/// A response only counts if it is a 200, declares an HTML content type and
/// contains one of the rendering markers; anything else means "no HTML
/// rendering" and the caller falls back to the PDF.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: HttpClient,
    resolver: SourceResolver,
    markers: Vec<String>,
    timeout: Duration,
}

impl HtmlFetcher {
    pub fn new(
        client: HttpClient,
        resolver: SourceResolver,
        http: &HttpConfig,
        extraction: &ExtractionConfig,
    ) -> Self {
        Self {
            client,
            resolver,
            markers: extraction.html_markers.clone(),
            timeout: http.html_timeout(),
        }
    }

    /// The HTML document, or `None` if no valid rendering could be fetched
    pub async fn fetch(&self, paper_id: &str) -> Option<String> {
        match self.try_fetch(paper_id).await {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::info!("HTML rendering unavailable for {}: {}", paper_id, e);
                None
            }
        }
    }

    /// Like [`fetch`](Self::fetch), keeping the reason the rendering was rejected
    pub async fn try_fetch(&self, paper_id: &str) -> Result<String, PaperError> {
        let url = self.resolver.html_url(paper_id);
        tracing::debug!("Fetching HTML rendering: {}", url);

        let response = self
            .client
            .get(&url, self.timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(PaperError::Fetch(format!("{} returned status {}", url, status)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(PaperError::Fetch(format!(
                "{} returned content type '{}'",
                url, content_type
            )));
        }

        let body = response.text().await.map_err(|e| self.fetch_error(e))?;

        if !self.markers.iter().any(|marker| body.contains(marker.as_str())) {
            return Err(PaperError::Fetch(format!(
                "{} does not look like a paper rendering",
                url
            )));
        }

        tracing::debug!("Fetched HTML rendering: {} ({} bytes)", url, body.len());
        Ok(body)
    }

    fn fetch_error(&self, err: reqwest::Error) -> PaperError {
        if err.is_timeout() {
            PaperError::Fetch(format!("timed out after {}s", self.timeout.as_secs()))
        } else {
            PaperError::Fetch(err.to_string())
        }
    }
}

/// Reduces an HTML paper rendering to normalized text
#[derive(Debug, Clone)]
pub struct HtmlTextExtractor {
    containers: Vec<Selector>,
    noise: Selector,
    min_chars: usize,
}

impl HtmlTextExtractor {
    /// `selectors` are content containers in priority order
    pub fn new(selectors: &[String], min_chars: usize) -> Result<Self, PaperError> {
        let containers = selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            containers,
            noise: parse_selector("script, style")?,
            min_chars,
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, PaperError> {
        Self::new(&config.content_selectors, config.min_content_chars)
    }

    /// Text of the first content container present in `html`
    pub fn extract(&self, html: &str) -> Result<String, PaperError> {
        let mut document = Html::parse_document(html);

        let noise: Vec<_> = document.select(&self.noise).map(|el| (*el).id()).collect();
        for id in noise {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let container = self
            .containers
            .iter()
            .find_map(|selector| document.select(selector).next())
            .ok_or_else(|| PaperError::Extraction("no main content region found".to_string()))?;

        let text = normalize_whitespace(&container.text().collect::<String>());
        ensure_min_length(text, self.min_chars, "HTML")
    }
}

fn parse_selector(selector: &str) -> Result<Selector, PaperError> {
    Selector::parse(selector)
        .map_err(|e| PaperError::InvalidRequest(format!("invalid selector '{}': {}", selector, e)))
}
