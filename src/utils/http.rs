//! HTTP client utilities.

use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::sources::PaperError;

/// Shared HTTP client with sensible defaults.
///
/// Request timeouts are set per call; each upstream has its own budget.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a client from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, PaperError> {
        Self::with_user_agent(&config.user_agent)
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, PaperError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| PaperError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a GET request bounded by `timeout`
    pub fn get(&self, url: &str, timeout: Duration) -> RequestBuilder {
        self.client.get(url).timeout(timeout)
    }
}
