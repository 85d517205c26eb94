// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Everything the crawl needs arrives here: the search itself (postcode,
// travel time, price and bed ranges, how many properties to visit) and the
// runtime settings (concurrency, timeouts, output).
//
// cli.criteria() and cli.crawl_config() turn the raw arguments into validated
// types, so main never starts a crawl with e.g. min price > max price.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::crawl::{CrawlConfig, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::CrawlError;
use crate::search::{SearchCriteria, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(
    name = "rent-scout",
    version,
    about = "Crawl Zoopla rental listings within a travel time of a postcode",
    long_about = "rent-scout searches Zoopla for properties to rent within a walking + train \
                  travel time of a postcode, follows every result through to its detail page, \
                  and prints one record per property (price, page views, features, description)."
)]
pub struct Cli {
    /// Postcode to search around (e.g. SW1A1AA)
    pub postcode: String,

    /// Travel time from the postcode, in minutes
    pub time_distance: u32,

    /// Stop after following this many properties (default: no limit)
    #[arg(long)]
    pub max_property_pages: Option<usize>,

    /// Minimum monthly rent
    #[arg(long, default_value_t = 1200)]
    pub min_price: u32,

    /// Maximum monthly rent
    #[arg(long, default_value_t = 1700)]
    pub max_price: u32,

    /// Minimum number of bedrooms
    #[arg(long, default_value_t = 1)]
    pub min_beds: u32,

    /// Maximum number of bedrooms
    #[arg(long, default_value_t = 1)]
    pub max_beds: u32,

    /// How many pages to fetch at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Pause after each fetch, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Search URL the postcode is appended to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Print records as JSON Lines instead of a table
    #[arg(long)]
    pub json: bool,

    /// Write records as JSON Lines to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Validated search criteria
    pub fn criteria(&self) -> Result<SearchCriteria, CrawlError> {
        SearchCriteria::new(
            &self.postcode,
            self.time_distance,
            (self.min_price, self.max_price),
            (self.min_beds, self.max_beds),
            self.max_property_pages,
        )
    }

    /// Validated runtime settings
    pub fn crawl_config(&self) -> Result<CrawlConfig, CrawlError> {
        CrawlConfig::new(
            &self.base_url,
            self.concurrency,
            Duration::from_secs(self.timeout_secs),
            Duration::from_millis(self.delay_ms),
            self.user_agent.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["rent-scout", "SW1A1AA", "30"]).unwrap();

        assert_eq!(cli.min_price, 1200);
        assert_eq!(cli.max_price, 1700);
        assert_eq!(cli.max_property_pages, None);
        assert!(!cli.json);

        let criteria = cli.criteria().unwrap();
        assert_eq!(criteria.postcode(), "SW1-A1AA");
        assert_eq!(criteria.duration_secs(), 1800);

        let config = cli.crawl_config().unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "rent-scout",
            "E14",
            "20",
            "--max-property-pages",
            "10",
            "--min-price",
            "900",
            "--max-price",
            "1100",
            "--min-beds",
            "2",
            "--max-beds",
            "3",
            "--concurrency",
            "2",
            "--delay-ms",
            "250",
            "--json",
            "-o",
            "out.jsonl",
        ])
        .unwrap();

        let criteria = cli.criteria().unwrap();
        assert_eq!(criteria.max_property_pages(), Some(10));
        assert_eq!(criteria.beds().max, 3);

        let config = cli.crawl_config().unwrap();
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(cli.output, Some(PathBuf::from("out.jsonl")));
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let cli = Cli::try_parse_from([
            "rent-scout",
            "E14",
            "20",
            "--min-price",
            "2000",
            "--max-price",
            "1000",
        ])
        .unwrap();

        assert!(matches!(cli.criteria(), Err(CrawlError::Validation(_))));
    }

    #[test]
    fn test_missing_time_distance() {
        assert!(Cli::try_parse_from(["rent-scout", "E14"]).is_err());
    }
}
