//! Tests for bulk request rendering and reply handling

use super::*;
use crate::app::services::index_sink::ElasticClient;
use crate::app::services::index_sink::elastic::{bulk_body, check_bulk_reply};
use crate::config::IndexConfig;
use serde_json::{Value, json};

fn documents() -> Vec<IndexDocument> {
    vec![
        IndexDocument {
            id: 1,
            source: sample_record(1.5).to_document(None),
        },
        IndexDocument {
            id: 2,
            source: sample_record(2.5).to_document(None),
        },
    ]
}

#[test]
fn test_bulk_body_pairs_actions_with_sources() {
    let body = bulk_body("quakes", "quake", &documents()).unwrap();
    let lines: Vec<&str> = body.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(body.ends_with('\n'));

    let action: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(action, json!({"index": {"_index": "quakes", "_type": "quake", "_id": 1}}));

    let source: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(source["Magnitude"], json!(1.5));

    let action: Value = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(action["index"]["_id"], json!(2));
}

#[test]
fn test_bulk_body_omits_empty_doc_type() {
    let body = bulk_body("quakes", "", &documents()).unwrap();
    let action: Value = serde_json::from_str(body.lines().next().unwrap()).unwrap();

    assert_eq!(action, json!({"index": {"_index": "quakes", "_id": 1}}));
}

#[test]
fn test_bulk_reply_without_errors() {
    let reply = json!({"took": 3, "errors": false, "items": []});
    assert_eq!(check_bulk_reply(&reply, 2).unwrap(), 2);
}

#[test]
fn test_bulk_reply_with_item_errors() {
    let reply = json!({
        "errors": true,
        "items": [
            {"index": {"_id": "1", "status": 201}},
            {"index": {"_id": "2", "status": 400, "error": {"type": "mapper_parsing_exception"}}}
        ]
    });

    match check_bulk_reply(&reply, 2) {
        Err(Error::IndexSink { message }) => {
            assert!(message.starts_with("1 of 2 documents rejected"));
            assert!(message.contains("mapper_parsing_exception"));
        }
        other => panic!("expected index sink error, got {:?}", other),
    }
}

#[test]
fn test_client_base_url_from_config() {
    let config = IndexConfig {
        host: "localhost".to_string(),
        port: 9200,
        index_name: "quakes".to_string(),
        doc_type: "quake".to_string(),
    };
    let client = ElasticClient::new(&config).unwrap();
    assert_eq!(client.base_url(), "http://localhost:9200");

    let client = ElasticClient::with_base_url("https://search.example.org/").unwrap();
    assert_eq!(client.base_url(), "https://search.example.org");
}
