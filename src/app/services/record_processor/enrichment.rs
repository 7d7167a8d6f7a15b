//! Location labelling for transformed records
//!
//! The nearest-place lookup is an injected capability so runs are
//! reproducible against a scripted lookup. Lookups happen one at a time, in
//! input order.

use crate::Result;
use crate::app::models::{EnrichedRecord, PlaceLabels};
use crate::app::services::field_transformer::RecordTemplate;
use std::sync::Arc;
use tracing::trace;

/// Nearest-place lookup capability
pub trait PlaceLookup {
    /// Labels of the place(s) nearest to a coordinate pair
    ///
    /// An empty result means no match. Several results mean several places tie
    /// for nearest, and each yields its own output row.
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<PlaceLabels>>;
}

impl<T: PlaceLookup + ?Sized> PlaceLookup for &T {
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<PlaceLabels>> {
        (**self).lookup(latitude, longitude)
    }
}

impl<T: PlaceLookup + ?Sized> PlaceLookup for Arc<T> {
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<PlaceLabels>> {
        (**self).lookup(latitude, longitude)
    }
}

/// How a record's labels were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    /// The lookup returned this many places
    Matched(usize),
    /// The lookup returned nothing
    NoMatch,
    /// Latitude or longitude was unusable, so no lookup was made
    NoCoordinates,
}

/// Labelled records produced from one transformed row
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    pub status: LookupStatus,
}

/// Attaches place labels using a lookup collaborator
#[derive(Debug, Clone)]
pub struct LocationEnricher<L> {
    lookup: L,
}

impl<L: PlaceLookup> LocationEnricher<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Label a transformed row
    ///
    /// One record per lookup result, or exactly one record with empty labels
    /// when there is no result. Lookup failures propagate.
    pub fn enrich(&self, template: RecordTemplate) -> Result<Enrichment> {
        let Some((latitude, longitude)) = template.coordinates else {
            trace!("No usable coordinates, emitting unlabelled record");
            return Ok(Enrichment {
                records: vec![template.record.with_labels(&PlaceLabels::empty())],
                status: LookupStatus::NoCoordinates,
            });
        };

        let results = self.lookup.lookup(latitude, longitude)?;
        if results.is_empty() {
            trace!("No place found near ({}, {})", latitude, longitude);
            return Ok(Enrichment {
                records: vec![template.record.with_labels(&PlaceLabels::empty())],
                status: LookupStatus::NoMatch,
            });
        }

        let status = LookupStatus::Matched(results.len());
        let records = results
            .iter()
            .map(|labels| template.record.with_labels(labels))
            .collect();
        Ok(Enrichment { records, status })
    }
}
