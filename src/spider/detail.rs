// src/spider/detail.rs
// =============================================================================
// Detail page processing: the second stage of the crawl.
//
// Takes the detail page and the PartialListing that was carried along with the
// request, pulls out the remaining fields and produces a finished
// PropertyRecord. One page in, one record (or one error) out.
// =============================================================================

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::listing::PartialListing;
use super::normalize::parse_integer;
use super::page::{child_elements, following_siblings, has_label, own_text_joined, Page};
use crate::error::CrawlError;

static ANY_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("universal selector is valid"));

static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("heading selector is valid"));

const PAGE_VIEWS_LABEL: &str = "Page views";
const FEATURES_HEADING: &str = "Property features";
const DESCRIPTION_HEADING: &str = "Property description";

/// A fully assembled property, ready for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub price: u64,
    pub page_views: u64,
    pub features: Vec<String>,
    pub description: String,
    /// Canonical URL of the detail page (after redirects)
    pub url: String,
}

// Builds a PropertyRecord from a detail page and its carried listing
//
// Fails with MissingField if there is no page view counter, and with Parse if
// the counter has no digits. Features and description may be empty.
pub fn process_detail(page: &Page, listing: PartialListing) -> Result<PropertyRecord, CrawlError> {
    let document = Html::parse_document(&page.body);

    let page_views_text = find_page_views(&document).ok_or(CrawlError::MissingField {
        field: "page views",
    })?;
    let page_views = parse_integer(&page_views_text)?;

    Ok(PropertyRecord {
        price: listing.price,
        page_views,
        features: extract_features(&document),
        description: extract_description(&document),
        url: page.url.to_string(),
    })
}

// Text of the <strong> that follows the "Page views" label
fn find_page_views(document: &Html) -> Option<String> {
    document
        .select(&ANY_ELEMENT)
        .filter(|element| has_label(*element, PAGE_VIEWS_LABEL))
        .find_map(|label| following_siblings(label, "strong").next())
        .map(|value| value.text().collect::<String>())
}

fn headings<'a>(document: &'a Html, title: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .select(&HEADINGS)
        .filter(move |heading| has_label(*heading, title))
}

// Every list item under the "Property features" heading, in order
fn extract_features(document: &Html) -> Vec<String> {
    headings(document, FEATURES_HEADING)
        .flat_map(|heading| following_siblings(heading, "ul"))
        .flat_map(|list| child_elements(list, "li"))
        .map(own_text_joined)
        .filter(|feature| !feature.is_empty())
        .collect()
}

// All text under the description block, each fragment trimmed and joined
// with single spaces
fn extract_description(document: &Html) -> String {
    headings(document, DESCRIPTION_HEADING)
        .flat_map(|heading| following_siblings(heading, "div"))
        .filter(|block| block.value().attr("itemprop") == Some("description"))
        .flat_map(|block| block.text())
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const DETAIL_URL: &str = "https://www.zoopla.co.uk/to-rent/details/42";

    fn listing() -> PartialListing {
        PartialListing {
            price: 1450,
            detail_url: Url::parse(DETAIL_URL).unwrap(),
        }
    }

    fn detail_page(body: &str) -> Page {
        Page::new(Url::parse(DETAIL_URL).unwrap(), body)
    }

    const FULL_DETAIL: &str = r#"<html><body>
        <div class="dp-view-count"><span>Page views</span> <strong>1,234 views</strong></div>
        <h3>Property features</h3>
        <ul><li>Garden</li><li> Parking </li></ul>
        <h3>Property description</h3>
        <div itemprop="description"> Lovely <b>flat </b></div>
      </body></html>"#;

    #[test]
    fn test_full_record() {
        let record = process_detail(&detail_page(FULL_DETAIL), listing()).unwrap();

        assert_eq!(
            record,
            PropertyRecord {
                price: 1450,
                page_views: 1234,
                features: vec!["Garden".to_string(), "Parking".to_string()],
                description: "Lovely flat".to_string(),
                url: DETAIL_URL.to_string(),
            }
        );
    }

    #[test]
    fn test_missing_page_views() {
        let html = r#"<h3>Property features</h3><ul><li>Garden</li></ul>"#;
        let result = process_detail(&detail_page(html), listing());

        assert_eq!(
            result,
            Err(CrawlError::MissingField {
                field: "page views"
            })
        );
    }

    #[test]
    fn test_page_views_without_digits() {
        let html = r#"<p><span>Page views</span><strong>n/a</strong></p>"#;
        let result = process_detail(&detail_page(html), listing());

        assert!(matches!(result, Err(CrawlError::Parse { .. })));
    }

    #[test]
    fn test_features_and_description_optional() {
        let html = r#"<p><span>Page views</span><strong>7</strong></p>"#;
        let record = process_detail(&detail_page(html), listing()).unwrap();

        assert_eq!(record.page_views, 7);
        assert!(record.features.is_empty());
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_description_ignores_other_blocks() {
        let html = r#"
            <p><span>Page views</span><strong>7</strong></p>
            <h3>Property description</h3>
            <div class="agent">Call us</div>
            <div itemprop="description">
              <p>Two bedroom flat</p>
              <p>  close to the station. </p>
            </div>
            <div itemprop="review">Great</div>"#;
        let record = process_detail(&detail_page(html), listing()).unwrap();

        assert_eq!(record.description, "Two bedroom flat close to the station.");
    }

    #[test]
    fn test_record_serializes_with_expected_fields() {
        let record = process_detail(&detail_page(FULL_DETAIL), listing()).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["price"], 1450);
        assert_eq!(json["page_views"], 1234);
        assert_eq!(json["features"][1], "Parking");
        assert_eq!(json["url"], DETAIL_URL);
    }
}
