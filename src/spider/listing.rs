// src/spider/listing.rs
// =============================================================================
// Listing page processing: the first stage of the two-stage crawl.
//
// For one page of search results we:
// 1. Find every result card link (in document order)
// 2. Read the price off the card, resolve the link, and emit a Detail request
//    carrying that price along to the detail stage
// 3. After all cards, emit a Listing request for the "Next" page, if any
//
// The crawl budget is checked before every card. Once it is spent we stop
// emitting entirely: no more detail requests, and no next page either, so the
// whole traversal winds down instead of fetching one more listing page.
// =============================================================================

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::budget::CrawlBudget;
use super::normalize::parse_integer;
use super::page::{own_text, own_text_joined, Page};

static DETAIL_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"div.listing-results-wrapper > div[class^="listing-results"] > a[href^="/to-rent/details"]"#,
    )
    .expect("detail link selector is valid")
});

static PAGINATION_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#content .paginate a[href]").expect("pagination selector is valid")
});

const NEXT_LABEL: &str = "Next";

/// What we know about a property after the listing page alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialListing {
    /// Monthly rent, in whole currency units
    pub price: u64,
    /// Absolute URL of the property's detail page
    pub detail_url: Url,
}

/// A page we still need to fetch, tagged with how to process it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlRequest {
    /// Another page of search results
    Listing { url: Url },
    /// A property's detail page; the partial listing rides along with it
    Detail { listing: PartialListing },
}

impl CrawlRequest {
    pub fn url(&self) -> &Url {
        match self {
            CrawlRequest::Listing { url } => url,
            CrawlRequest::Detail { listing } => &listing.detail_url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CrawlRequest::Listing { .. } => "listing",
            CrawlRequest::Detail { .. } => "detail",
        }
    }
}

/// Everything one listing page produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListingScan {
    /// Detail requests in document order, then at most one next-page request
    pub requests: Vec<CrawlRequest>,
    /// Result cards dropped because their price or link was unusable
    pub skipped_cards: usize,
}

// Processes one listing page
//
// Returns the follow-up requests in order: detail requests in document order,
// then at most one request for the next listing page.
pub fn process_listing(page: &Page, budget: &CrawlBudget) -> ListingScan {
    let document = Html::parse_document(&page.body);
    let mut scan = ListingScan::default();

    for anchor in document.select(&DETAIL_LINKS) {
        if budget.reached() {
            debug!(url = %page.url, issued = budget.issued(), "Crawl budget reached, stopping");
            return scan;
        }

        let listing = match read_listing(page, anchor) {
            Some(listing) => listing,
            None => {
                scan.skipped_cards += 1;
                continue;
            }
        };

        // Another listing page may have taken the last slot since reached()
        if !budget.try_claim() {
            debug!(url = %page.url, issued = budget.issued(), "Crawl budget reached, stopping");
            return scan;
        }

        debug!(url = %listing.detail_url, price = listing.price, "Queueing detail page");
        scan.requests.push(CrawlRequest::Detail { listing });
    }

    // The last card may have used up the budget; don't fetch a page we'd
    // throw away
    if budget.reached() {
        return scan;
    }

    match find_next_page(page, &document) {
        Some(url) => {
            debug!(url = %url, "Queueing next listing page");
            scan.requests.push(CrawlRequest::Listing { url });
        }
        None => debug!(url = %page.url, "No next page, pagination ends here"),
    }

    scan
}

// Reads price and link off one result card
//
// Cards we can't make sense of are skipped with a warning rather than
// failing the whole page.
fn read_listing(page: &Page, anchor: ElementRef<'_>) -> Option<PartialListing> {
    let Some(href) = anchor.value().attr("href") else {
        warn!(url = %page.url, "Result card without href, skipping");
        return None;
    };

    let price_text = own_text(anchor)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or_default();

    let price = match parse_integer(price_text) {
        Ok(price) => price,
        Err(e) => {
            warn!(url = %page.url, href, error = %e, "Unreadable price, skipping card");
            return None;
        }
    };

    let Some(detail_url) = page.resolve(href) else {
        warn!(url = %page.url, href, "Could not resolve detail link, skipping card");
        return None;
    };

    Some(PartialListing { price, detail_url })
}

// Finds the "Next" link in the results' pagination control
fn find_next_page(page: &Page, document: &Html) -> Option<Url> {
    document
        .select(&PAGINATION_LINKS)
        .find(|link| own_text_joined(*link) == NEXT_LABEL)
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| page.resolve(href))
}
