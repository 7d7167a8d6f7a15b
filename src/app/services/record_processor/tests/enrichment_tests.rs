//! Tests for location labelling

use super::*;
use crate::app::models::FieldValue;
use crate::app::services::field_transformer::{RecordTemplate, TransformOutcome};
use crate::app::services::record_processor::{LookupStatus, LocationEnricher};

fn template(coordinates: Option<(f64, f64)>) -> RecordTemplate {
    let row = crate::app::services::field_transformer::tests::ncedc_row("2016/01/02 03:04:05.00");
    match FieldTransformer::new(ncedc_dates()).transform(&row) {
        TransformOutcome::Ready(mut template) => {
            template.coordinates = coordinates;
            template
        }
        TransformOutcome::Skip(reason) => panic!("fixture skipped: {:?}", reason),
    }
}

fn label(record: &crate::app::models::EnrichedRecord, name: &str) -> String {
    match record.get(name) {
        Some(FieldValue::Text(text)) => text.clone(),
        other => panic!("{} not text: {:?}", name, other),
    }
}

#[test]
fn test_single_match_labels_record() {
    let lookup = ScriptedLookup::new().answer(37.5, -122.1, vec![somewhere()]);
    let enricher = LocationEnricher::new(&lookup);

    let enrichment = enricher.enrich(template(Some((37.5, -122.1)))).unwrap();

    assert_eq!(enrichment.status, LookupStatus::Matched(1));
    assert_eq!(enrichment.records.len(), 1);
    let record = &enrichment.records[0];
    assert_eq!(label(record, "cc"), "US");
    assert_eq!(label(record, "admin1"), "California");
    assert_eq!(label(record, "admin2"), "");
    assert_eq!(label(record, "name"), "Somewhere");
    assert_eq!(*lookup.calls.borrow(), vec![(37.5, -122.1)]);
}

#[test]
fn test_no_match_yields_one_unlabelled_record() {
    let lookup = ScriptedLookup::new();
    let enricher = LocationEnricher::new(&lookup);

    let enrichment = enricher.enrich(template(Some((0.0, 0.0)))).unwrap();

    assert_eq!(enrichment.status, LookupStatus::NoMatch);
    assert_eq!(enrichment.records.len(), 1);
    for name in ["cc", "admin1", "admin2", "name"] {
        assert_eq!(label(&enrichment.records[0], name), "");
    }
}

#[test]
fn test_multiple_matches_fan_out_in_result_order() {
    let lookup = ScriptedLookup::new().answer(
        37.5,
        -122.1,
        vec![
            PlaceLabels::new("US", "California", "Alameda County", "Alpha"),
            PlaceLabels::new("US", "California", "Santa Clara County", "Beta"),
        ],
    );
    let enricher = LocationEnricher::new(&lookup);

    let enrichment = enricher.enrich(template(Some((37.5, -122.1)))).unwrap();

    assert_eq!(enrichment.status, LookupStatus::Matched(2));
    let names: Vec<String> = enrichment.records.iter().map(|r| label(r, "name")).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    assert_eq!(
        enrichment.records[0].get("Magnitude"),
        enrichment.records[1].get("Magnitude")
    );
}

#[test]
fn test_missing_coordinates_skip_lookup() {
    let lookup = ScriptedLookup::new();
    let enricher = LocationEnricher::new(&lookup);

    let enrichment = enricher.enrich(template(None)).unwrap();

    assert_eq!(enrichment.status, LookupStatus::NoCoordinates);
    assert_eq!(enrichment.records.len(), 1);
    assert!(lookup.calls.borrow().is_empty());
}

#[test]
fn test_lookup_failure_propagates() {
    let enricher = LocationEnricher::new(ScriptedLookup::failing());
    let result = enricher.enrich(template(Some((1.0, 1.0))));

    assert!(matches!(result, Err(Error::PlaceRegistry { .. })));
}
