// src/spider/budget.rs
// =============================================================================
// The crawl budget: how many detail pages a single run may follow through to.
//
// Listing pages can be processed concurrently, so the "is there room left?"
// check and the increment have to happen as one atomic step. try_claim() does
// exactly that with a compare-and-swap loop (AtomicUsize::fetch_update).
//
// Counts only ever go up. A cancelled crawl keeps whatever was already issued.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct CrawlBudget {
    issued: AtomicUsize,
    max: Option<usize>,
}

impl CrawlBudget {
    /// `None` means no cap.
    pub fn new(max: Option<usize>) -> Self {
        Self {
            issued: AtomicUsize::new(0),
            max,
        }
    }

    /// True once the number of issued detail requests hits the cap
    pub fn reached(&self) -> bool {
        match self.max {
            Some(max) => self.issued() >= max,
            None => false,
        }
    }

    /// Counts one more issued detail request.
    pub fn record_issued(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
    }

    /// Atomically checks the cap and records one issued request.
    ///
    /// Returns false (and records nothing) if the budget is already spent.
    pub fn try_claim(&self) -> bool {
        let Some(max) = self.max else {
            self.record_issued();
            return true;
        };

        self.issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |issued| {
                (issued < max).then_some(issued + 1)
            })
            .is_ok()
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }
}
