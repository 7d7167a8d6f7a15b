//! Run counters and summary for a geocoding pass

use super::enrichment::LookupStatus;
use std::time::Duration;

/// Statistics for one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Source rows consumed, including skipped ones
    pub rows_read: u64,
    /// Rows dropped for an unparseable event time
    pub rows_skipped: u64,
    /// Rows written to the output file
    pub rows_written: u64,
    /// Documents accepted by the search index
    pub documents_indexed: u64,
    /// Rows whose lookup returned no place
    pub lookup_misses: u64,
    /// Rows without usable coordinates
    pub missing_coordinates: u64,
    /// Rows whose lookup returned more than one place
    pub fan_out_rows: u64,
    /// Wall-clock time of the read loop
    pub elapsed: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one row's lookup outcome
    pub fn record_lookup(&mut self, status: LookupStatus) {
        match status {
            LookupStatus::Matched(count) if count > 1 => self.fan_out_rows += 1,
            LookupStatus::Matched(_) => {}
            LookupStatus::NoMatch => self.lookup_misses += 1,
            LookupStatus::NoCoordinates => self.missing_coordinates += 1,
        }
    }

    /// Rows read per second; 0 when no time has elapsed
    pub fn rows_per_second(&self) -> f64 {
        rate(self.rows_read, self.elapsed)
    }

    /// Get summary of run statistics
    pub fn summary(&self) -> String {
        format!(
            "Run Summary: {} rows read -> {} rows written | Skipped: {} | \
             No match: {} | No coordinates: {} | Fan-out: {} | Indexed: {}",
            self.rows_read,
            self.rows_written,
            self.rows_skipped,
            self.lookup_misses,
            self.missing_coordinates,
            self.fan_out_rows,
            self.documents_indexed
        )
    }
}

/// Rows per second over `elapsed`, or 0 when nothing has elapsed
pub fn rate(rows: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        rows as f64 / seconds
    } else {
        0.0
    }
}
