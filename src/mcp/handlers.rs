//! Handlers behind the four paper tools.

use std::sync::Arc;

use serde_json::Value;

use super::tools::ToolHandler;
use crate::models::{PaperMetadata, SearchQuery};
use crate::sources::{ArxivClient, ContentAssembler, PaperError, SourceResolver};

const DEFAULT_MAX_RESULTS: i64 = 5;

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, PaperError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| PaperError::InvalidRequest(format!("Missing '{}' parameter", key)))
}

/// `maxResults` (or `max_results`), at least 1
fn max_results(args: &Value) -> usize {
    // JSON callers may send 5 or 5.0
    let requested = args
        .get("maxResults")
        .or_else(|| args.get("max_results"))
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(DEFAULT_MAX_RESULTS);

    requested.max(1) as usize
}

/// Handler for `search_arxiv`
#[derive(Debug)]
pub struct SearchArxivHandler {
    pub arxiv: Arc<ArxivClient>,
}

#[async_trait::async_trait]
impl ToolHandler for SearchArxivHandler {
    async fn execute(&self, args: Value) -> Result<String, PaperError> {
        let query = required_str(&args, "query")?;
        let results = self
            .arxiv
            .search(&SearchQuery::new(query).max_results(max_results(&args)))
            .await?;

        Ok(results.render())
    }
}

/// Handler for `get_recent_ai_papers`
#[derive(Debug)]
pub struct RecentPapersHandler {
    pub arxiv: Arc<ArxivClient>,
}

#[async_trait::async_trait]
impl ToolHandler for RecentPapersHandler {
    async fn execute(&self, _args: Value) -> Result<String, PaperError> {
        self.arxiv.recent_listing().await
    }
}

/// Handler for `get_arxiv_pdf_url`
#[derive(Debug)]
pub struct PdfUrlHandler {
    pub resolver: SourceResolver,
}

#[async_trait::async_trait]
impl ToolHandler for PdfUrlHandler {
    async fn execute(&self, args: Value) -> Result<String, PaperError> {
        let input = required_str(&args, "input")?;
        let pdf_url = self.resolver.pdf_url(input)?;
        Ok(format!("PDF download link: {}", pdf_url))
    }
}

/// Handler for `parse_paper_content`
#[derive(Debug)]
pub struct ParsePaperContentHandler {
    pub assembler: Arc<ContentAssembler>,
}

#[async_trait::async_trait]
impl ToolHandler for ParsePaperContentHandler {
    async fn execute(&self, args: Value) -> Result<String, PaperError> {
        let input = required_str(&args, "input")?;

        let metadata = args
            .get("paperInfo")
            .filter(|v| !v.is_null())
            .map(|v| serde_json::from_value::<PaperMetadata>(v.clone()))
            .transpose()?;

        let result = self.assembler.assemble(input, metadata.as_ref()).await?;
        Ok(result.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pdf_url_handler() -> PdfUrlHandler {
        PdfUrlHandler {
            resolver: SourceResolver::new("http://arxiv.org"),
        }
    }

    #[tokio::test]
    async fn test_pdf_url_from_abs_url() {
        let text = pdf_url_handler()
            .execute(json!({"input": "http://arxiv.org/abs/2403.15137v1"}))
            .await
            .unwrap();
        assert_eq!(text, "PDF download link: http://arxiv.org/pdf/2403.15137v1.pdf");
    }

    #[tokio::test]
    async fn test_pdf_url_from_bare_id() {
        let text = pdf_url_handler()
            .execute(json!({"input": "2403.15137v1"}))
            .await
            .unwrap();
        assert_eq!(text, "PDF download link: http://arxiv.org/pdf/2403.15137v1.pdf");
    }

    #[test]
    fn test_pdf_url_missing_input() {
        let err = tokio_test::block_on(pdf_url_handler().execute(json!({}))).unwrap_err();
        assert!(matches!(err, PaperError::InvalidRequest(_)));
    }

    #[test]
    fn test_max_results() {
        assert_eq!(max_results(&json!({})), 5);
        assert_eq!(max_results(&json!({"maxResults": 12})), 12);
        assert_eq!(max_results(&json!({"maxResults": 3.0})), 3);
        assert_eq!(max_results(&json!({"max_results": 7})), 7);
        assert_eq!(max_results(&json!({"maxResults": "ten"})), 5);
    }

    #[test]
    fn test_max_results_at_least_one() {
        assert_eq!(max_results(&json!({"maxResults": -3})), 1);
        assert_eq!(max_results(&json!({"maxResults": -2.5})), 1);
        assert_eq!(max_results(&json!({"maxResults": 0})), 1);
        assert_eq!(max_results(&json!({"maxResults": 0.4})), 1);
    }

    #[test]
    fn test_required_str_rejects_non_strings() {
        assert!(required_str(&json!({"input": 42}), "input").is_err());
        assert_eq!(required_str(&json!({"input": "x"}), "input").unwrap(), "x");
    }
}
