// src/spider/normalize.rs
// =============================================================================
// Small pure helpers that turn noisy page text into typed values.
//
// - normalize_postcode: "SW1A1AA" -> "SW1-A1AA" (the form the search path uses)
// - parse_integer: "£1,450 pcm" -> 1450
// =============================================================================

use crate::error::CrawlError;

const POSTCODE_SEPARATOR: char = '-';

// Normalizes a postcode for the search URL
//
// Trims whitespace and inserts a '-' after the third character when the
// postcode is longer than three characters. A postcode that already has the
// separator in that position is returned as is.
//
// Examples:
//   "SW1A1AA"   -> "SW1-A1AA"
//   " E14 "     -> "E14"
//   "SW1-A1AA"  -> "SW1-A1AA"
pub fn normalize_postcode(raw: &str) -> String {
    let trimmed = raw.trim();

    // Split on characters, not bytes, so non-ASCII input can't panic
    let mut chars = trimmed.char_indices();
    let split_at = match chars.nth(3) {
        Some((index, c)) if c != POSTCODE_SEPARATOR => index,
        _ => return trimmed.to_string(),
    };

    let (outward, inward) = trimmed.split_at(split_at);
    format!("{}{}{}", outward, POSTCODE_SEPARATOR, inward)
}

// Parses an integer out of free text by dropping every non-digit
//
// Returns CrawlError::Parse if there are no digits left; a missing price or
// view count must not turn silently into zero.
pub fn parse_integer(text: &str) -> Result<u64, CrawlError> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();

    digits.parse::<u64>().map_err(|_| CrawlError::Parse {
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postcode_gets_separator() {
        assert_eq!(normalize_postcode("SW1A1AA"), "SW1-A1AA");
        assert_eq!(normalize_postcode("AB12CD"), "AB1-2CD");
    }

    #[test]
    fn test_postcode_is_trimmed() {
        assert_eq!(normalize_postcode("  E14 "), "E14");
        assert_eq!(normalize_postcode("\tN168"), "N16-8");
        // A space at index 3 is kept, the separator still goes in front of it
        assert_eq!(normalize_postcode("\tN16 8"), "N16- 8");
    }

    #[test]
    fn test_short_postcode_unchanged() {
        assert_eq!(normalize_postcode("SW1"), "SW1");
        assert_eq!(normalize_postcode("E1"), "E1");
        assert_eq!(normalize_postcode(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["SW1A1AA", "AB12CD", "N168", "\tN168", "N16 8", "E14", "W1"] {
            let once = normalize_postcode(raw);
            assert_eq!(normalize_postcode(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_postcode_non_ascii_does_not_panic() {
        assert_eq!(normalize_postcode("ÅÄÖÜX"), "ÅÄÖ-ÜX");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_integer("£1,450 pcm"), Ok(1450));
        assert_eq!(parse_integer("1,234 views"), Ok(1234));
        assert_eq!(parse_integer("  42 "), Ok(42));
    }

    #[test]
    fn test_parse_no_digits() {
        assert_eq!(
            parse_integer("no digits here"),
            Err(CrawlError::Parse {
                text: "no digits here".to_string()
            })
        );
        assert!(parse_integer("").is_err());
    }
}
