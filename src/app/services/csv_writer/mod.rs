//! Enriched CSV output
//!
//! Streams enriched records to the output file in the configured dialect. The
//! column layout is fixed by the [`OutputSchema`](crate::app::services::field_transformer::OutputSchema)
//! derived from the source header, so every row has the same width even when a
//! record is missing a field.

pub mod writer;

pub use writer::QuakeCsvWriter;
