//! Content assembly: HTML first, PDF fallback.
//!
//! Each stage yields a plain `Result`; the HTML stage's failures are
//! reported as "absent" and only steer the selection, while the PDF stage's
//! failure is terminal.

use super::{HtmlFetcher, HtmlTextExtractor, PaperError, PdfFetcher, ResolvedPaper, SourceResolver};
use crate::config::Config;
use crate::models::{join_authors, ContentSource, ExtractionResult, PaperMetadata};
use crate::utils::{HttpClient, PdfTextExtractor};

/// Produces the full-text artifact for one paper
#[derive(Debug, Clone)]
pub struct ContentAssembler {
    resolver: SourceResolver,
    html_fetcher: HtmlFetcher,
    html_extractor: HtmlTextExtractor,
    pdf_fetcher: PdfFetcher,
    pdf_extractor: PdfTextExtractor,
}

impl ContentAssembler {
    pub fn new(
        resolver: SourceResolver,
        html_fetcher: HtmlFetcher,
        html_extractor: HtmlTextExtractor,
        pdf_fetcher: PdfFetcher,
        pdf_extractor: PdfTextExtractor,
    ) -> Self {
        Self {
            resolver,
            html_fetcher,
            html_extractor,
            pdf_fetcher,
            pdf_extractor,
        }
    }

    /// Wire up every stage from configuration, sharing one HTTP client
    pub fn from_config(config: &Config, client: HttpClient) -> Result<Self, PaperError> {
        let resolver = SourceResolver::new(&config.arxiv.base_url);
        Ok(Self::new(
            resolver.clone(),
            HtmlFetcher::new(client.clone(), resolver, &config.http, &config.extraction),
            HtmlTextExtractor::from_config(&config.extraction)?,
            PdfFetcher::new(client, &config.http, &config.extraction),
            PdfTextExtractor::new(config.extraction.min_content_chars),
        ))
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// Extract the paper behind `identifier`, prefixed with a header
    pub async fn assemble(
        &self,
        identifier: &str,
        metadata: Option<&PaperMetadata>,
    ) -> Result<ExtractionResult, PaperError> {
        let paper = self.resolver.resolve(identifier)?;

        let (body, source) = match self.html_stage(&paper).await {
            Ok(text) => (text, ContentSource::Html),
            // Only an absent rendering falls back; a stub page is an extraction failure
            Err(PaperError::Fetch(reason)) => {
                tracing::info!(
                    "Falling back to PDF for {} ({})",
                    paper.paper_id,
                    reason
                );
                let text = self
                    .pdf_stage(&paper)
                    .await
                    .map_err(|e| PaperError::UpstreamUnavailable(Box::new(e)))?;
                (text, ContentSource::Pdf)
            }
            Err(other) => return Err(other),
        };

        tracing::info!(
            "Extracted {} characters for {} from {}",
            body.chars().count(),
            paper.paper_id,
            source.tag()
        );

        Ok(ExtractionResult {
            content: format_content(&paper.paper_id, source, metadata, &body),
            source,
        })
    }

    async fn html_stage(&self, paper: &ResolvedPaper) -> Result<String, PaperError> {
        let html = self.html_fetcher.try_fetch(&paper.paper_id).await?;
        self.html_extractor.extract(&html)
    }

    async fn pdf_stage(&self, paper: &ResolvedPaper) -> Result<String, PaperError> {
        let artifact = self.pdf_fetcher.download(&paper.pdf_url).await?;
        let text = self.pdf_extractor.extract(artifact.path()).await;
        // Removes the file whether or not extraction succeeded
        drop(artifact);
        text
    }
}

/// Prefix `body` with the metadata header, or a minimal source header
pub fn format_content(
    paper_id: &str,
    source: ContentSource,
    metadata: Option<&PaperMetadata>,
    body: &str,
) -> String {
    let mut output = String::new();

    match metadata {
        Some(meta) => {
            output.push_str("=== Paper Information ===\n");
            output.push_str(&format!("Title: {}\n", meta.title));
            output.push_str(&format!("arXiv ID: {}\n", paper_id));
            output.push_str(&format!("Published: {}\n", meta.published));
            output.push_str(&format!("Content Source: {}\n", source.tag()));
            if !meta.authors.is_empty() {
                output.push_str(&format!("Authors: {}\n", join_authors(&meta.authors)));
            }
            output.push_str(&format!("Summary: {}\n", meta.summary));
            output.push_str("\n=== Paper Content ===\n\n");
        }
        None => {
            output.push_str(&format!("=== Paper Content (source: {}) ===\n\n", source.tag()));
        }
    }

    output.push_str(body);
    output
}
