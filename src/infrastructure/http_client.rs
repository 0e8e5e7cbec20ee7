//! HTTP client for listing page fetches
//!
//! A thin reqwest wrapper with a fixed per-request timeout and user agent.
//! There is no retry and no backoff: a failed request is reported to the
//! caller, which ends pagination for the category being scraped. Pacing
//! between requests is the pagination loop's fixed sleep, not the client's.

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{error, info};

use crate::domain::services::PageFetcher;
use crate::infrastructure::config::{ScrapingConfig, defaults};

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Create HttpClientConfig from the scraper settings
    pub fn from_scraping_config(config: &ScrapingConfig) -> Self {
        Self {
            timeout_seconds: config.request_timeout_seconds,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP client used by the scraper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client })
    }

    /// Fetch the body of a URL. Non-2xx statuses are errors.
    pub async fn fetch_body(&self, url: &str) -> Result<String> {
        info!("🌐 HTTP GET: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            error!("❌ HTTP error {}: {}", response.status(), url);
            return Err(anyhow!("HTTP error {}: {}", response.status(), url));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetch_body(url).await
    }
}
