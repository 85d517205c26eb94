// src/search/criteria.rs
// =============================================================================
// Validated search criteria.
//
// SearchCriteria can only be built through SearchCriteria::new, which
// normalizes the postcode and rejects impossible combinations up front. That
// way a crawl with min > max never issues a single request.
// =============================================================================

use crate::error::CrawlError;
use crate::spider::normalize_postcode;

/// Results per listing page; the site's maximum
pub const PAGE_SIZE: u32 = 100;

/// An inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

impl Range {
    fn new(min: u32, max: u32, what: &str) -> Result<Self, CrawlError> {
        if min > max {
            return Err(CrawlError::Validation(format!(
                "minimum {} ({}) is greater than maximum {} ({})",
                what, min, what, max
            )));
        }
        Ok(Self { min, max })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    postcode: String,
    time_distance_minutes: u32,
    price: Range,
    beds: Range,
    page_size: u32,
    max_property_pages: Option<usize>,
}

impl SearchCriteria {
    // Validates and builds the criteria
    //
    // Parameters:
    //   postcode: raw postcode as typed by the user (normalized here)
    //   time_distance_minutes: travel time from the postcode
    //   price: (min, max) monthly rent
    //   beds: (min, max) bedrooms
    //   max_property_pages: cap on detail pages, None for no cap
    pub fn new(
        postcode: &str,
        time_distance_minutes: u32,
        price: (u32, u32),
        beds: (u32, u32),
        max_property_pages: Option<usize>,
    ) -> Result<Self, CrawlError> {
        let postcode = normalize_postcode(postcode);
        if postcode.is_empty() {
            return Err(CrawlError::Validation("postcode is empty".to_string()));
        }

        if time_distance_minutes == 0 {
            return Err(CrawlError::Validation(
                "time distance must be at least one minute".to_string(),
            ));
        }

        if max_property_pages == Some(0) {
            return Err(CrawlError::Validation(
                "max property pages must be positive".to_string(),
            ));
        }

        Ok(Self {
            postcode,
            time_distance_minutes,
            price: Range::new(price.0, price.1, "price")?,
            beds: Range::new(beds.0, beds.1, "beds")?,
            page_size: PAGE_SIZE,
            max_property_pages,
        })
    }

    /// The normalized postcode
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    pub fn time_distance_minutes(&self) -> u32 {
        self.time_distance_minutes
    }

    /// Travel time in seconds, as the search expects it
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.time_distance_minutes) * 60
    }

    pub fn price(&self) -> Range {
        self.price
    }

    pub fn beds(&self) -> Range {
        self.beds
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_property_pages(&self) -> Option<usize> {
        self.max_property_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_criteria() {
        let criteria = SearchCriteria::new(" SW1A1AA ", 30, (1200, 1700), (1, 2), Some(50)).unwrap();

        assert_eq!(criteria.postcode(), "SW1-A1AA");
        assert_eq!(criteria.duration_secs(), 1800);
        assert_eq!(criteria.price(), Range { min: 1200, max: 1700 });
        assert_eq!(criteria.beds(), Range { min: 1, max: 2 });
        assert_eq!(criteria.page_size(), 100);
        assert_eq!(criteria.max_property_pages(), Some(50));
    }

    #[test]
    fn test_equal_bounds_allowed() {
        assert!(SearchCriteria::new("E14", 10, (1500, 1500), (1, 1), None).is_ok());
    }

    #[test]
    fn test_price_min_above_max() {
        let err = SearchCriteria::new("E14", 10, (1800, 1200), (1, 1), None).unwrap_err();
        assert!(matches!(err, CrawlError::Validation(ref msg) if msg.contains("price")));
    }

    #[test]
    fn test_beds_min_above_max() {
        let err = SearchCriteria::new("E14", 10, (1200, 1800), (3, 2), None).unwrap_err();
        assert!(matches!(err, CrawlError::Validation(ref msg) if msg.contains("beds")));
    }

    #[test]
    fn test_empty_postcode() {
        assert!(matches!(
            SearchCriteria::new("   ", 10, (1, 2), (1, 1), None),
            Err(CrawlError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_time_distance_and_cap() {
        assert!(SearchCriteria::new("E14", 0, (1, 2), (1, 1), None).is_err());
        assert!(SearchCriteria::new("E14", 5, (1, 2), (1, 1), Some(0)).is_err());
    }
}
