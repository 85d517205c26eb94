// src/crawl/queue.rs
// =============================================================================
// The crawl loop: a queue of pending requests and a bounded set of fetches in
// flight.
//
// How it works:
// 1. Start with the search URL as a single Listing request
// 2. Keep up to `concurrency` requests fetching at once
// 3. When one finishes, run the matching processor on the page:
//    - listing pages yield more requests, which go to the back of the queue
//    - detail pages yield a PropertyRecord, which goes to the sink
// 4. Stop when the queue is empty and nothing is in flight
//
// Failures stay local: a page that can't be fetched is skipped (for a listing
// page that quietly ends pagination), a result card with an unreadable price
// is skipped, and a detail page missing a field drops just that one record.
// All three are counted in the summary. There are no retries and no
// deduplication; the site's pagination is trusted not to loop.
//
// Cancellation: once the token fires we stop taking requests off the queue,
// let whatever is in flight finish, and return.
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::config::CrawlConfig;
use super::fetch::Fetcher;
use crate::error::CrawlError;
use crate::output::RecordSink;
use crate::spider::{
    process_detail, process_listing, CrawlBudget, CrawlRequest, ListingScan, PropertyRecord,
};

/// Counters for a finished crawl
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub listing_pages: usize,
    pub detail_requests_issued: usize,
    pub records: usize,
    /// Detail pages that failed to parse
    pub dropped_records: usize,
    /// Pages (of either kind) that could not be fetched
    pub failed_pages: usize,
    /// Result cards with an unreadable price or link
    pub skipped_cards: usize,
    pub cancelled: bool,
}

impl CrawlSummary {
    /// True if anything went missing along the way
    pub fn has_losses(&self) -> bool {
        self.dropped_records > 0 || self.failed_pages > 0 || self.skipped_cards > 0
    }
}

// What one finished request produced
enum Outcome {
    Listing(ListingScan),
    Detail(Result<PropertyRecord, CrawlError>),
    FetchFailed(&'static str, CrawlError),
}

pub struct Crawler<F> {
    fetcher: F,
    budget: Arc<CrawlBudget>,
    concurrency: usize,
    delay: Duration,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, config: &CrawlConfig, max_property_pages: Option<usize>) -> Self {
        Self {
            fetcher,
            budget: Arc::new(CrawlBudget::new(max_property_pages)),
            concurrency: config.concurrency.max(1),
            delay: config.delay,
        }
    }

    // Runs the crawl from `start` until there is nothing left to fetch
    //
    // Only a failing sink aborts the run; every other error is logged and
    // counted in the summary.
    pub async fn run(
        &self,
        start: Url,
        sink: &mut dyn RecordSink,
        cancel: &CancellationToken,
    ) -> Result<CrawlSummary> {
        info!(url = %start, max_property_pages = ?self.budget.max(), concurrency = self.concurrency, "Starting crawl");

        let mut queue = VecDeque::new();
        queue.push_back(CrawlRequest::Listing { url: start });

        let mut in_flight = FuturesUnordered::new();
        let mut summary = CrawlSummary::default();

        loop {
            if cancel.is_cancelled() && !summary.cancelled {
                info!(pending = queue.len(), in_flight = in_flight.len(), "Crawl cancelled, draining in-flight pages");
                summary.cancelled = true;
            }

            while !summary.cancelled && in_flight.len() < self.concurrency {
                let Some(request) = queue.pop_front() else {
                    break;
                };
                debug!(kind = request.kind(), url = %request.url(), "Fetching");
                in_flight.push(self.handle(request));
            }

            let outcome = tokio::select! {
                outcome = in_flight.next() => outcome,
                _ = cancel.cancelled(), if !summary.cancelled => continue,
            };

            let Some(outcome) = outcome else {
                break;
            };

            match outcome {
                Outcome::Listing(scan) => {
                    summary.listing_pages += 1;
                    summary.skipped_cards += scan.skipped_cards;
                    debug!(
                        new_requests = scan.requests.len(),
                        skipped_cards = scan.skipped_cards,
                        "Listing page processed"
                    );
                    queue.extend(scan.requests);
                }
                Outcome::Detail(Ok(record)) => {
                    summary.records += 1;
                    sink.accept(record)?;
                }
                Outcome::Detail(Err(e)) => {
                    warn!(error = %e, "Dropping property record");
                    summary.dropped_records += 1;
                }
                Outcome::FetchFailed(kind, e) => {
                    warn!(kind, error = %e, "Skipping page");
                    summary.failed_pages += 1;
                }
            }
        }

        summary.detail_requests_issued = self.budget.issued();

        info!(
            listing_pages = summary.listing_pages,
            records = summary.records,
            dropped = summary.dropped_records,
            failed = summary.failed_pages,
            skipped_cards = summary.skipped_cards,
            cancelled = summary.cancelled,
            "Crawl completed"
        );

        Ok(summary)
    }

    // Fetches one request and runs the processor for its kind
    async fn handle(&self, request: CrawlRequest) -> Outcome {
        let page = match self.fetcher.fetch(request.url()).await {
            Ok(page) => page,
            Err(e) => return Outcome::FetchFailed(request.kind(), e),
        };

        // Polite crawling: pause before this worker picks up the next page
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match request {
            CrawlRequest::Listing { .. } => Outcome::Listing(process_listing(&page, &self.budget)),
            CrawlRequest::Detail { listing } => Outcome::Detail(process_detail(&page, listing)),
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. FuturesUnordered
//    - Every in-flight fetch borrows the crawler (&self), so they are polled
//      from this task rather than handed to tokio::spawn
//    - next() yields whichever fetch finishes first
//
// 2. The budget
//    - Processors run inside the in-flight futures, so two listing pages can
//      both be processed between the same pair of awaits; try_claim keeps the
//      check-and-increment in one step
//
// 3. Ordering
//    - Requests from one listing page keep their order in the queue
//    - Completions come back in any order
// -----------------------------------------------------------------------------
