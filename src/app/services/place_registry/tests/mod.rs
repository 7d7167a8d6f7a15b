//! Shared test utilities and fixtures for place registry tests

use crate::app::models::Place;
use std::fs;
use std::path::{Path, PathBuf};

pub mod loader_tests;

/// Create a test place with standard labels
pub fn create_test_place(name: &str, lat: f64, lon: f64, cc: &str) -> Place {
    Place {
        lat,
        lon,
        name: name.to_string(),
        admin1: format!("{} Region", name),
        admin2: format!("{} County", name),
        cc: cc.to_string(),
    }
}

/// A small Californian place table in GeoNames column order
pub const CALIFORNIA_TABLE: &str = "\
lat,lon,name,admin1,admin2,cc
37.77493,-122.41942,San Francisco,California,San Francisco County,US
37.80437,-122.2708,Oakland,California,Alameda County,US
37.33939,-121.89496,San Jose,California,Santa Clara County,US
38.58157,-121.4944,Sacramento,California,Sacramento County,US
34.05223,-118.24368,Los Angeles,California,Los Angeles County,US
";

/// Write a place table into `dir` and return its path
pub fn write_place_table(dir: &Path, content: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("rg_cities1000.csv");
    fs::write(&path, content)?;
    Ok(path)
}
