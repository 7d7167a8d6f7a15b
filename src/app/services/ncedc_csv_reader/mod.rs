//! Streaming reader for NCEDC-formatted earthquake CSV files
//!
//! The source file is a delimited text file with a header row. Each data row
//! is exposed as a [`RawRecord`](crate::app::models::RawRecord) mapping header
//! names to raw string values in header order. The `DateTime` column is
//! required; everything else is passed through for the field transformer.

pub mod reader;

pub use reader::NcedcCsvReader;
