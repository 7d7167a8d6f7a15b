//! Field transformer for NCEDC event records
//!
//! Reshapes one source row into the output record template:
//!
//! 1. `DateTime` loses its trailing fractional-seconds suffix, has its date
//!    separator swapped, and is stored in place as `Event_DTG`
//! 2. `Event_DTG` must parse against the configured pattern, otherwise the
//!    whole row is skipped
//! 3. the parsed value is exploded into `Event_Year` .. `Event_Sec`
//! 4. numeric columns are coerced through parse-or-null
//! 5. `Latitude`/`Longitude` are kept as floats for the place lookup
//!
//! ## Architecture
//!
//! - [`transformer`] - Row transformation and skip decisions
//! - [`field_parsers`] - Parse-or-null coercion and date-time group helpers
//! - [`schema`] - Output column layout derived from the source header

pub mod field_parsers;
pub mod schema;
pub mod transformer;

#[cfg(test)]
pub mod tests;

pub use schema::OutputSchema;
pub use transformer::{FieldTransformer, RecordTemplate, SkipReason, TransformOutcome};
