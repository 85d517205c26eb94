// src/output.rs
// =============================================================================
// Where finished PropertyRecords go.
//
// The crawl loop hands records to a RecordSink one at a time, in whatever
// order detail pages finish. Sinks:
// - JsonLinesSink: one JSON object per line (stdout or a file)
// - TableSink: a human-readable line per record
// - Vec<PropertyRecord>: collect in memory
// =============================================================================

use std::io::Write;

use anyhow::{Context, Result};

use crate::spider::PropertyRecord;

pub trait RecordSink {
    fn accept(&mut self, record: PropertyRecord) -> Result<()>;

    /// Called once after the crawl; flush buffered output here.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<PropertyRecord> {
    fn accept(&mut self, record: PropertyRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Writes each record as a single line of JSON
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn accept(&mut self, record: PropertyRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &record).context("Failed to serialize record")?;
        writeln!(self.writer).context("Failed to write record")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }
}

/// Prints one aligned line per record: price, views, URL
pub struct TableSink<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> TableSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }
}

impl<W: Write> RecordSink for TableSink<W> {
    fn accept(&mut self, record: PropertyRecord) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{:<10} {:<10} {:<10} {}", "PRICE", "VIEWS", "FEATURES", "URL")?;
            writeln!(self.writer, "{}", "=".repeat(90))?;
            self.header_written = true;
        }

        writeln!(
            self.writer,
            "{:<10} {:<10} {:<10} {}",
            format!("£{}", record.price),
            record.page_views,
            record.features.len(),
            record.url
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }
}
