// src/crawl/fetch.rs
// =============================================================================
// Downloading pages.
//
// The crawl loop only knows about the Fetcher trait, so tests can swap in an
// in-memory site. HttpFetcher is the real thing, built on reqwest:
// - one shared Client (connection pooling)
// - request timeout and a limited redirect policy
// - non-2xx responses count as failures
//
// The page URL we hand back is the final URL after redirects; detail records
// use it as their canonical URL.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::config::CrawlConfig;
use crate::error::CrawlError;
use crate::spider::Page;

/// Anything that can turn a URL into a page
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page, CrawlError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CrawlError::Validation(format!("could not build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, CrawlError> {
        let fetch_error = |reason: String| CrawlError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(describe_error(&e)))?;

        Ok(Page::new(final_url, body))
    }
}

// Turns a reqwest error into a short human-readable reason
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}
