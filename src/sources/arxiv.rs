//! arXiv search API and category listing.

use feed_rs::parser;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

use super::PaperError;
use crate::config::{ArxivConfig, HttpConfig};
use crate::models::{ArxivPaper, AuthorEntry, SearchQuery, SearchResults};
use crate::utils::{normalize_whitespace, HttpClient};

/// arXiv returns at most this many entries per request
const MAX_PAGE_SIZE: usize = 200;

fn total_results_pattern() -> &'static Regex {
    static TOTAL: OnceLock<Regex> = OnceLock::new();
    TOTAL.get_or_init(|| {
        Regex::new(r"<opensearch:totalResults[^>]*>\s*(\d+)\s*<").expect("valid totalResults regex")
    })
}

/// Client for the arXiv Atom API and listing pages
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: HttpClient,
    api_url: String,
    base_url: String,
    recent_category: String,
    search_timeout: Duration,
    listing_timeout: Duration,
}

impl ArxivClient {
    pub fn new(client: HttpClient, arxiv: &ArxivConfig, http: &HttpConfig) -> Self {
        Self {
            client,
            api_url: arxiv.api_url.clone(),
            base_url: arxiv.base_url.trim_end_matches('/').to_string(),
            recent_category: arxiv.recent_category.clone(),
            search_timeout: http.search_timeout(),
            listing_timeout: http.listing_timeout(),
        }
    }

    /// Search all fields for `query.query`
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, PaperError> {
        if query.query.trim().is_empty() {
            return Err(PaperError::InvalidRequest("empty search query".to_string()));
        }

        let url = format!(
            "{}?search_query={}&start=0&max_results={}",
            self.api_url,
            urlencoding::encode(&format!("all:{}", query.query)),
            query.max_results.min(MAX_PAGE_SIZE)
        );
        tracing::debug!("Searching arXiv: {}", url);

        let response = self
            .client
            .get(&url, self.search_timeout)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| PaperError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(PaperError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PaperError::Network(format!("Failed to read response: {}", e)))?;

        parse_feed(&body)
    }

    /// Raw HTML of the recent-submissions listing for the configured category
    pub async fn recent_listing(&self) -> Result<String, PaperError> {
        let url = format!("{}/list/{}/recent", self.base_url, self.recent_category);
        tracing::info!("Fetching recent papers: {}", url);

        let response = self
            .client
            .get(&url, self.listing_timeout)
            .send()
            .await
            .map_err(|e| PaperError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(PaperError::Api(format!(
                "{} returned status: {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PaperError::Network(format!("Failed to read response: {}", e)))
    }
}

/// Parse an Atom search response
fn parse_feed(body: &str) -> Result<SearchResults, PaperError> {
    let feed = parser::parse(body.as_bytes())
        .map_err(|e| PaperError::Parse(format!("Failed to parse Atom feed: {}", e)))?;

    let papers: Vec<ArxivPaper> = feed.entries.iter().map(parse_entry).collect();

    let total_results = total_results_pattern()
        .captures(body)
        .and_then(|c| c[1].parse::<u64>().ok())
        .unwrap_or(papers.len() as u64);

    Ok(SearchResults {
        total_results,
        papers,
    })
}

fn parse_entry(entry: &feed_rs::model::Entry) -> ArxivPaper {
    let url = entry.id.clone();
    let id = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    ArxivPaper {
        id,
        url,
        title: entry
            .title
            .as_ref()
            .map(|t| normalize_whitespace(&t.content))
            .unwrap_or_default(),
        summary: entry
            .summary
            .as_ref()
            .map(|s| normalize_whitespace(&s.content))
            .unwrap_or_default(),
        published: entry.published.map(|d| d.to_rfc3339()).unwrap_or_default(),
        authors: entry
            .authors
            .iter()
            .map(|a| AuthorEntry::Named {
                name: a.name.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-03-25T00:00:00-04:00</updated>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">1234</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <entry>
    <id>http://arxiv.org/abs/2403.15137v1</id>
    <updated>2024-03-22T12:00:00Z</updated>
    <published>2024-03-22T12:00:00Z</published>
    <title>Graph Networks
      for Everything</title>
    <summary>  We study graph
      networks.  </summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2401.00001v2</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <published>2024-01-01T00:00:00Z</published>
    <title>Second</title>
    <summary>Another.</summary>
    <author><name>Grace Hopper</name></author>
  </entry>
</feed>"#;

    fn client(server_url: &str) -> ArxivClient {
        let arxiv = ArxivConfig {
            base_url: server_url.to_string(),
            api_url: format!("{}/api/query", server_url),
            ..Default::default()
        };
        let http = HttpConfig::default();
        ArxivClient::new(HttpClient::new(&http).unwrap(), &arxiv, &http)
    }

    #[test]
    fn test_parse_feed() {
        let results = parse_feed(FEED).unwrap();

        assert_eq!(results.total_results, 1234);
        assert_eq!(results.papers.len(), 2);

        let first = &results.papers[0];
        assert_eq!(first.id, "2403.15137v1");
        assert_eq!(first.url, "http://arxiv.org/abs/2403.15137v1");
        assert_eq!(first.title, "Graph Networks for Everything");
        assert_eq!(first.summary, "We study graph networks.");
        assert!(first.published.starts_with("2024-03-22T12:00:00"));
        assert_eq!(first.authors.len(), 2);
        assert_eq!(first.authors[1].display_name(), "Alan Turing");
    }

    #[test]
    fn test_parse_feed_without_total() {
        let feed = FEED.replace(
            r#"<opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">1234</opensearch:totalResults>"#,
            "",
        );
        assert_eq!(parse_feed(&feed).unwrap().total_results, 2);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_feed("definitely not xml"),
            Err(PaperError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_search_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search_query".into(), "all:graph networks".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("max_results".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let results = client(&server.url())
            .search(&SearchQuery::new("graph networks").max_results(2))
            .await
            .unwrap();

        assert_eq!(results.papers.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let result = client("http://127.0.0.1:1")
            .search(&SearchQuery::new("  "))
            .await;
        assert!(matches!(result, Err(PaperError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = client(&server.url()).search(&SearchQuery::new("x")).await;
        assert!(matches!(result, Err(PaperError::Api(_))));
    }

    #[tokio::test]
    async fn test_recent_listing_passthrough() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/list/cs.AI/recent")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><dl>recent</dl></html>")
            .create_async()
            .await;

        let html = client(&server.url()).recent_listing().await.unwrap();
        assert_eq!(html, "<html><dl>recent</dl></html>");
    }
}
