// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG)
// 2. Parse and validate command-line arguments
// 3. Build the search URL and run the crawl
// 4. Print a summary and exit with a proper code:
//    0 = crawl finished cleanly
//    1 = crawl finished, but some pages failed, cards were skipped or
//        records were dropped
//    2 = error (bad arguments, output failure, ...)
// =============================================================================

mod cli;
mod crawl;
mod error;
mod output;
mod search;
mod spider;

use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use crawl::{CrawlSummary, Crawler, HttpFetcher};
use output::{JsonLinesSink, RecordSink, TableSink};
use search::build_search_url;

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON Lines on stdout stay machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rent_scout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Both of these fail fast, before anything is fetched
    let criteria = cli.criteria()?;
    let config = cli.crawl_config()?;

    let start_url = build_search_url(&config.base_url, &criteria);
    eprintln!("🔍 Searching {} within {} min", criteria.postcode(), criteria.time_distance_minutes());
    eprintln!("🌐 {}", start_url);

    let fetcher = HttpFetcher::new(&config)?;
    let crawler = Crawler::new(fetcher, &config, criteria.max_property_pages());

    let mut sink = open_sink(&cli)?;

    // Ctrl-C stops the crawl; pages already in flight still finish
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping crawl");
            ctrl_c.cancel();
        }
    });

    let summary = crawler.run(start_url, sink.as_mut(), &cancel).await?;
    sink.finish()?;

    print_summary(&summary);

    if summary.has_losses() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Picks the output: a file, JSON Lines on stdout, or a table on stdout
fn open_sink(cli: &Cli) -> Result<Box<dyn RecordSink>> {
    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        return Ok(Box::new(JsonLinesSink::new(BufWriter::new(file))));
    }

    if cli.json {
        Ok(Box::new(JsonLinesSink::new(io::stdout().lock())))
    } else {
        Ok(Box::new(TableSink::new(io::stdout().lock())))
    }
}

fn print_summary(summary: &CrawlSummary) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   📄 Listing pages: {}", summary.listing_pages);
    eprintln!("   🏠 Properties followed: {}", summary.detail_requests_issued);
    eprintln!("   ✅ Records: {}", summary.records);
    eprintln!("   ⚠️  Dropped records: {}", summary.dropped_records);
    eprintln!("   ❌ Failed pages: {}", summary.failed_pages);
    eprintln!("   🚫 Skipped result cards: {}", summary.skipped_cards);
    if summary.cancelled {
        eprintln!("   ⏹️  Crawl was cancelled");
    }
}
