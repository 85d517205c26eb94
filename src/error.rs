// src/error.rs
// =============================================================================
// Error types for the crawl core.
//
// The crawl distinguishes four kinds of failure, and each one is handled
// differently by the controller:
// - Parse: a price or view count had no digits -> drop that one record
// - MissingField: a required detail-page element is absent -> drop the record
// - Fetch: the page could not be downloaded -> skip the page
// - Validation: bad search criteria or config -> the crawl never starts
//
// The binary layer (main.rs) still uses anyhow for its own plumbing; these
// typed errors are what the crawl modules return.
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while crawling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrawlError {
    /// A numeric field (price, page views) had no extractable digits
    #[error("could not parse an integer from {text:?}")]
    Parse { text: String },

    /// A required field was structurally absent from a detail page
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// Transport-level failure or non-2xx status
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Search criteria or configuration rejected before crawling
    #[error("invalid input: {0}")]
    Validation(String),
}
