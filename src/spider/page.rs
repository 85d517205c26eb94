// src/spider/page.rs
// =============================================================================
// A fetched page plus the handful of DOM walks the processors need.
//
// scraper gives us CSS selectors, which cover the listing page. The detail
// page is laid out as "label, then sibling with the value", e.g.
//
//   <span>Page views</span> <strong>1,234</strong>
//   <h3>Property features</h3> <ul><li>Garden</li></ul>
//
// CSS can't select "the sibling after the element whose text is X", so we
// find the label element first and then walk its following siblings through
// the underlying ego_tree nodes.
// =============================================================================

use scraper::ElementRef;
use url::Url;

/// A downloaded document: the final URL (after redirects) and its body
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

impl Page {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    /// Resolves a (possibly relative) href against this page's URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        self.url.join(href).ok()
    }
}

// Direct text children of an element, in document order.
// Text inside nested elements is not included.
pub(crate) fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}

// Direct text of an element, trimmed, with blank pieces dropped and the rest
// joined by single spaces
pub(crate) fn own_text_joined(element: ElementRef<'_>) -> String {
    own_text(element)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// Whether one of the element's own text nodes reads exactly `label`
// (ignoring surrounding whitespace)
pub(crate) fn has_label(element: ElementRef<'_>, label: &str) -> bool {
    own_text(element).any(|text| text.trim() == label)
}

// Following sibling elements with the given tag name
pub(crate) fn following_siblings<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(move |sibling| sibling.value().name() == tag)
}

// Child elements with the given tag name
pub(crate) fn child_elements<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn page(url: &str) -> Page {
        Page::new(Url::parse(url).unwrap(), "")
    }

    #[test]
    fn test_resolve_relative_href() {
        let page = page("https://www.zoopla.co.uk/to-rent/property/sw1-a1aa?page_size=100");
        let resolved = page.resolve("/to-rent/details/123").unwrap();
        assert_eq!(resolved.as_str(), "https://www.zoopla.co.uk/to-rent/details/123");
    }

    #[test]
    fn test_resolve_absolute_href() {
        let page = page("https://www.zoopla.co.uk/to-rent/property/");
        let resolved = page.resolve(" https://other.example/x ").unwrap();
        assert_eq!(resolved.as_str(), "https://other.example/x");
    }

    #[test]
    fn test_resolve_empty_href() {
        let page = page("https://www.zoopla.co.uk/");
        assert!(page.resolve("   ").is_none());
    }

    #[test]
    fn test_own_text_skips_nested_elements() {
        let html = Html::parse_fragment(r#"<a>£1,200 pcm <span>(£277 pw)</span></a>"#);
        let selector = Selector::parse("a").unwrap();
        let anchor = html.select(&selector).next().unwrap();

        assert_eq!(own_text_joined(anchor), "£1,200 pcm");
        assert!(has_label(anchor, "£1,200 pcm"));
    }

    #[test]
    fn test_following_siblings_by_tag() {
        let html = Html::parse_fragment(
            r#"<div><h3>Title</h3><p>skip</p><ul><li>a</li><li>b</li></ul><ul><li>c</li></ul></div>"#,
        );
        let selector = Selector::parse("h3").unwrap();
        let heading = html.select(&selector).next().unwrap();

        let items: Vec<String> = following_siblings(heading, "ul")
            .flat_map(|list| child_elements(list, "li"))
            .map(own_text_joined)
            .collect();

        assert_eq!(items, vec!["a", "b", "c"]);
    }
}
