// src/crawl/config.rs
// =============================================================================
// Runtime settings for the crawl: where the search lives, how many pages may
// be in flight, and how polite to be.
//
// These come from the command line (see cli.rs). Anything that would make the
// crawl misbehave is rejected here, before a single request goes out.
// =============================================================================

use std::time::Duration;

use url::Url;

use crate::error::CrawlError;
use crate::search::DEFAULT_BASE_URL;

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("rent-scout/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Search path the postcode gets appended to
    pub base_url: Url,
    /// Maximum number of pages being fetched at once
    pub concurrency: usize,
    pub request_timeout: Duration,
    /// Pause after each fetch, per worker
    pub delay: Duration,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn new(
        base_url: &str,
        concurrency: usize,
        request_timeout: Duration,
        delay: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, CrawlError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CrawlError::Validation(format!("invalid base URL '{}': {}", base_url, e)))?;

        // build_search_url appends the postcode as a path segment
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(CrawlError::Validation(format!(
                "base URL must be an http(s) URL: {}",
                base_url
            )));
        }

        if concurrency == 0 {
            return Err(CrawlError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if request_timeout.is_zero() {
            return Err(CrawlError::Validation(
                "request timeout must be positive".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            concurrency,
            request_timeout,
            delay,
            user_agent: user_agent.into(),
        })
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::ZERO,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = CrawlConfig::new(
            "https://www.zoopla.co.uk/to-rent/property/",
            4,
            Duration::from_secs(5),
            Duration::from_millis(100),
            "test-agent",
        )
        .unwrap();

        assert_eq!(config.concurrency, 4);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_rejects_non_http_base() {
        let result = CrawlConfig::new(
            "mailto:someone@example.com",
            4,
            Duration::from_secs(5),
            Duration::ZERO,
            "ua",
        );
        assert!(matches!(result, Err(CrawlError::Validation(_))));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let result = CrawlConfig::new(DEFAULT_BASE_URL, 0, Duration::from_secs(5), Duration::ZERO, "ua");
        assert!(matches!(result, Err(CrawlError::Validation(_))));
    }

    #[test]
    fn test_default_matches_constants() {
        let config = CrawlConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }
}
