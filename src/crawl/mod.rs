// src/crawl/mod.rs
// =============================================================================
// This module drives the crawl.
//
// Features:
// - Bounded number of pages in flight at once
// - Crawl budget shared across all listing pages
// - Optional delay between requests (polite crawling)
// - Clean stop on cancellation
//
// Submodules:
// - config: runtime settings (base URL, concurrency, timeouts)
// - fetch: the Fetcher trait and the reqwest-backed HttpFetcher
// - queue: the request queue and crawl loop
// =============================================================================

mod config;
mod fetch;
mod queue;

pub use config::{CrawlConfig, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use fetch::HttpFetcher;
pub use queue::{CrawlSummary, Crawler};
