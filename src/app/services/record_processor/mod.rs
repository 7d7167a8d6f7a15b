//! Record processing pipeline for earthquake event files
//!
//! This module drives the single pass over a source file: every row is read,
//! reshaped, labelled with its nearest place(s), written, and optionally queued
//! for the search index before the next row is read.
//!
//! # Architecture
//!
//! - [`processor`] - `GeocodePipeline` and the main read loop
//! - [`enrichment`] - The `PlaceLookup` capability and location labelling
//! - [`progress`] - Throughput reporting at the flush cadence
//! - [`stats`] - Run counters and the final summary
//!
//! # Row Accounting
//!
//! Flushes and progress lines are keyed to rows *read*, so a row that is
//! skipped for an unparseable timestamp still advances the cadence. A row whose
//! lookup returns several places fans out into several written rows; the row
//! limit applies to rows read, never to rows written.

pub mod enrichment;
pub mod processor;
pub mod progress;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use enrichment::{Enrichment, LocationEnricher, LookupStatus, PlaceLookup};
pub use processor::GeocodePipeline;
pub use progress::ProgressReporter;
pub use stats::RunStats;
