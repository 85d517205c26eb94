// src/search/mod.rs
// =============================================================================
// What we're searching for, and the URL the crawl starts from.
// =============================================================================

mod criteria;
mod query;

pub use criteria::SearchCriteria;
pub use query::{build_search_url, DEFAULT_BASE_URL};
