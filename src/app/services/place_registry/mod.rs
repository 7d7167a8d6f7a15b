//! Offline place registry for reverse geo-coding
//!
//! This module provides the default nearest-place lookup. It loads a
//! GeoNames-derived place table (`lat,lon,name,admin1,admin2,cc`) and answers
//! "which known place is closest to this coordinate pair" without any network
//! access, single-threaded and deterministically.

use crate::Result;
use crate::app::models::{Place, PlaceLabels, valid_coordinates};
use crate::app::services::record_processor::enrichment::PlaceLookup;
use std::path::PathBuf;

pub mod loader;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use loader::LoadStats;
pub use query::haversine_km;

/// Place registry providing nearest-place lookups
///
/// Places are kept in table order; a latitude-sorted index drives the
/// nearest-neighbour sweep.
#[derive(Debug, Clone)]
pub struct PlaceRegistry {
    /// Places in table order
    pub(crate) places: Vec<Place>,

    /// Indices into `places`, sorted by latitude
    pub(crate) by_latitude: Vec<usize>,

    /// Table the registry was loaded from
    pub(crate) source_path: Option<PathBuf>,
}

impl PlaceRegistry {
    /// Create a new empty place registry
    pub fn new() -> Self {
        Self {
            places: Vec::new(),
            by_latitude: Vec::new(),
            source_path: None,
        }
    }

    /// Build a registry from places in table order
    pub fn from_places(places: Vec<Place>) -> Self {
        let mut by_latitude: Vec<usize> = (0..places.len()).collect();
        by_latitude.sort_by(|&a, &b| places[a].lat.total_cmp(&places[b].lat));

        Self {
            places,
            by_latitude,
            source_path: None,
        }
    }

    /// Get the total number of places in the registry
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Table the registry was loaded from, if any
    pub fn source_path(&self) -> Option<&PathBuf> {
        self.source_path.as_ref()
    }
}

impl Default for PlaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceLookup for PlaceRegistry {
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<PlaceLabels>> {
        if !valid_coordinates(latitude, longitude) {
            return Ok(Vec::new());
        }
        Ok(self
            .nearest(latitude, longitude)
            .into_iter()
            .map(Place::labels)
            .collect())
    }
}
