//! Tests for place table loading

use super::*;
use crate::Error;
use crate::app::services::place_registry::PlaceRegistry;
use tempfile::TempDir;

#[test]
fn test_load_place_table_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_place_table(temp_dir.path(), CALIFORNIA_TABLE).unwrap();

    let (registry, stats) = PlaceRegistry::load(&path).unwrap();

    assert_eq!(registry.place_count(), 5);
    assert_eq!(stats.rows_read, 5);
    assert_eq!(stats.places_loaded, 5);
    assert_eq!(stats.rows_rejected, 0);
    assert_eq!(registry.source_path(), Some(&path));
}

#[test]
fn test_load_missing_table_fails() {
    let temp_dir = TempDir::new().unwrap();
    let absent = temp_dir.path().join("absent.csv");
    let result = PlaceRegistry::load(&absent);

    match result {
        Err(Error::FileNotFound { path }) => assert_eq!(path, absent.display().to_string()),
        other => panic!("expected FileNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_rows_are_rejected_not_fatal() {
    let content = "\
lat,lon,name,admin1,admin2,cc
37.77493,-122.41942,San Francisco,California,San Francisco County,US
north,-122.0,Nowhere,California,,US
95.0,10.0,Beyond The Pole,,,XX
37.80437,-122.2708,Oakland,California,Alameda County,US
";
    let (registry, stats) = PlaceRegistry::from_reader(content.as_bytes(), "inline").unwrap();

    assert_eq!(registry.place_count(), 2);
    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.rows_rejected, 2);
    assert!(stats.summary().contains("2 places loaded from 4 rows"));
}

#[test]
fn test_blank_admin_labels_are_kept() {
    let content = "lat,lon,name,admin1,admin2,cc\n-41.28664,174.77557,Wellington,,,NZ\n";
    let (registry, _) = PlaceRegistry::from_reader(content.as_bytes(), "inline").unwrap();

    let found = registry.nearest(-41.3, 174.8);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Wellington");
    assert_eq!(found[0].admin1, "");
    assert_eq!(found[0].cc, "NZ");
}

#[test]
fn test_table_without_usable_places_fails() {
    let content = "lat,lon,name,admin1,admin2,cc\nbad,bad,Nowhere,,,XX\n";
    let result = PlaceRegistry::from_reader(content.as_bytes(), "inline");

    assert!(matches!(result, Err(Error::PlaceRegistry { .. })));
}
