// src/spider/mod.rs
// =============================================================================
// Site-specific crawl logic: what to pull out of each kind of page and which
// pages to visit next.
//
// Submodules:
// - normalize: postcode and integer helpers
// - budget: the shared cap on detail pages
// - page: the fetched document type plus DOM helpers
// - listing: search result pages -> detail requests + next page
// - detail: detail pages -> finished PropertyRecord
//
// Nothing in here does any I/O; the crawl module fetches pages and hands them
// to these processors.
// =============================================================================

mod budget;
mod detail;
mod listing;
mod normalize;
mod page;

pub use budget::CrawlBudget;
pub use detail::{process_detail, PropertyRecord};
pub use listing::{process_listing, CrawlRequest, ListingScan};
pub use normalize::normalize_postcode;
pub use page::Page;
