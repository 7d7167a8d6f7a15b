//! Place table loading
//!
//! This module handles loading the offline place table from disk. Rows with
//! unparseable or out-of-range coordinates are counted and skipped rather than
//! failing the whole load.

use super::PlaceRegistry;
use crate::app::models::Place;
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Statistics from loading a place table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Data rows seen in the table
    pub rows_read: usize,
    /// Places accepted into the registry
    pub places_loaded: usize,
    /// Rows rejected for bad shape or coordinates
    pub rows_rejected: usize,
    /// Time taken to load and index the table
    pub load_duration: Duration,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary line for logging
    pub fn summary(&self) -> String {
        format!(
            "{} places loaded from {} rows ({} rejected) in {:.2}s",
            self.places_loaded,
            self.rows_read,
            self.rows_rejected,
            self.load_duration.as_secs_f64()
        )
    }
}

impl PlaceRegistry {
    /// Load a place table from disk
    ///
    /// # Arguments
    /// * `path` - CSV file with a `lat,lon,name,admin1,admin2,cc` header
    ///
    /// # Errors
    /// * Returns `Error::FileNotFound` if the file does not exist
    /// * Returns `Error::PlaceRegistry` if the file holds no usable places
    /// * Returns `Error::CsvParsing` if the header row cannot be read
    pub fn load(path: &Path) -> Result<(Self, LoadStats)> {
        info!("Loading place table: {}", path.display());

        if !path.exists() {
            warn!("Place table missing; pass --places-file to point at a lat,lon,name,admin1,admin2,cc table");
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        let (mut registry, stats) = Self::from_reader(file, &path.display().to_string())?;
        registry.source_path = Some(path.to_path_buf());

        info!("Place registry ready: {}", stats.summary());
        Ok((registry, stats))
    }

    /// Load a place table from any byte source
    pub fn from_reader<R: Read>(source: R, label: &str) -> Result<(Self, LoadStats)> {
        let start_time = Instant::now();
        let mut stats = LoadStats::new();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| Error::csv_parsing(label, "Failed to read place table header", Some(e)))?
            .clone();
        debug!("Place table header: {:?}", headers);

        let mut places = Vec::new();
        for result in reader.deserialize::<Place>() {
            stats.rows_read += 1;
            match result {
                Ok(place) if place.has_valid_coordinates() => places.push(place),
                Ok(place) => {
                    debug!(
                        "Rejecting place '{}' with coordinates ({}, {})",
                        place.name, place.lat, place.lon
                    );
                    stats.rows_rejected += 1;
                }
                Err(e) => {
                    debug!("Rejecting malformed place row in {}: {}", label, e);
                    stats.rows_rejected += 1;
                }
            }
        }

        if places.is_empty() {
            return Err(Error::place_registry(format!(
                "No usable places found in {}",
                label
            )));
        }

        if stats.rows_rejected > 0 {
            warn!(
                "{} of {} place rows rejected in {}",
                stats.rows_rejected, stats.rows_read, label
            );
        }

        stats.places_loaded = places.len();
        let registry = Self::from_places(places);
        stats.load_duration = start_time.elapsed();

        Ok((registry, stats))
    }
}
