// src/search/query.rs
// =============================================================================
// Builds the first search results URL from SearchCriteria.
//
// Shape:
//   <base>/<postcode>?include_shared_accommodation=false&...&q=<postcode>
//
// The query keys always come out in the same order, so the same criteria
// always produce the same URL. Values are percent-encoded, with a space as
// %20 rather than the form-style '+'.
// =============================================================================

use url::{form_urlencoded, Url};

use super::criteria::SearchCriteria;

/// Where the "to rent" search lives
pub const DEFAULT_BASE_URL: &str = "http://www.zoopla.co.uk/to-rent/property/";

// Builds the search URL
//
// `base` must be able to carry path segments (http/https). CrawlConfig checks
// that when the base URL is configured.
pub fn build_search_url(base: &Url, criteria: &SearchCriteria) -> Url {
    let mut url = base.clone();

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(criteria.postcode());
    }

    let price = criteria.price();
    let beds = criteria.beds();

    let pairs = [
        ("include_shared_accommodation", "false".to_string()),
        ("price_frequency", "per_month".to_string()),
        ("results_sort", "most_popular".to_string()),
        ("search_source", "travel-time".to_string()),
        ("transport_type", "walking_train".to_string()),
        ("page_size", criteria.page_size().to_string()),
        ("beds_min", beds.min.to_string()),
        ("beds_max", beds.max.to_string()),
        ("price_min", price.min.to_string()),
        ("price_max", price.max.to_string()),
        ("duration", criteria.duration_secs().to_string()),
        ("q", criteria.postcode().to_string()),
    ];

    let query = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode_value(value)))
        .collect::<Vec<_>>()
        .join("&");
    url.set_query(Some(&query));

    url
}

// Percent-encodes a query value
//
// byte_serialize writes a literal '+' as %2B, so any '+' left in its output
// stands for a space.
fn encode_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
