//! Configuration management.
//!
//! Every setting has a default, so an empty (or missing) config file yields a
//! working server pointed at arxiv.org. See [`file_config`] for the file
//! format and lookup rules.

mod file_config;

pub use file_config::{find_config_file, load_config, load_layered, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints
    #[serde(default)]
    pub arxiv: ArxivConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Content extraction heuristics
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// arXiv endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Host used to build `/html/`, `/pdf/` and `/list/` URLs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Atom query API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Category listed by `get_recent_ai_papers`
    #[serde(default = "default_recent_category")]
    pub recent_category: String,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_url: default_api_url(),
            recent_category: default_recent_category(),
        }
    }
}

fn default_base_url() -> String {
    "http://arxiv.org".to_string()
}

fn default_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_recent_category() -> String {
    "cs.AI".to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the HTML rendering fetch
    #[serde(default = "default_html_timeout")]
    pub html_timeout_secs: u64,

    /// Timeout for the whole PDF download, body included
    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,

    /// Timeout for the category listing page
    #[serde(default = "default_listing_timeout")]
    pub listing_timeout_secs: u64,

    /// Timeout for the Atom search API
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
}

impl HttpConfig {
    pub fn html_timeout(&self) -> Duration {
        Duration::from_secs(self.html_timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            html_timeout_secs: default_html_timeout(),
            pdf_timeout_secs: default_pdf_timeout(),
            listing_timeout_secs: default_listing_timeout(),
            search_timeout_secs: default_search_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; ArXiv-Paper-MCP/1.0)".to_string()
}

fn default_html_timeout() -> u64 {
    20
}

fn default_pdf_timeout() -> u64 {
    30
}

fn default_listing_timeout() -> u64 {
    30
}

fn default_search_timeout() -> u64 {
    30
}

/// Heuristics used to tell a real paper body from an error or stub page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// At least one of these must appear in an HTML response for it to be accepted
    #[serde(default = "default_html_markers")]
    pub html_markers: Vec<String>,

    /// Content containers, tried in order
    #[serde(default = "default_content_selectors")]
    pub content_selectors: Vec<String>,

    /// Normalized text shorter than this (in characters) is rejected as a stub
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,

    /// Directory for transient PDF downloads (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl ExtractionConfig {
    /// Directory transient PDFs are written to
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            html_markers: default_html_markers(),
            content_selectors: default_content_selectors(),
            min_content_chars: default_min_content_chars(),
            temp_dir: None,
        }
    }
}

fn default_html_markers() -> Vec<String> {
    ["ltx_document", "ltx_page_main", "ltx_abstract"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_content_selectors() -> Vec<String> {
    [".ltx_page_main", ".ltx_document", "body"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_min_content_chars() -> usize {
    100
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }
}
