//! Saving and loading the collection file.

mod support;

use std::fs;

use serde_json::json;
use stockroom::codec;
use stockroom::config::Config;
use stockroom::error::StockError;
use stockroom::model::Product;
use stockroom::store::FileStore;
use support::builders::product_lines;
use support::harness::SessionHarness;
use tempfile::TempDir;

fn lines(parts: &[&str]) -> String {
    let mut text = parts.join("\n");
    text.push('\n');
    text
}

#[test]
fn test_save_then_load_is_lossless() {
    let mut h = SessionHarness::new();
    h.run(&lines(&[
        "add",
        &product_lines("Free", None, None),
        "add",
        &product_lines("Dear", Some("9.75"), Some("D-1")),
        "add",
        &product_lines("Cheap", Some("0.5"), Some("C-1")),
        "save",
    ]));
    let saved = fs::read_to_string(&h.store_path).unwrap();

    let reloaded = SessionHarness::with_contents(Config::default(), Some(&saved));
    let before: Vec<&Product> = h.session.collection().ascending().collect();
    let after: Vec<&Product> = reloaded.session.collection().ascending().collect();
    assert_eq!(before, after);

    // saving again produces the same bytes
    let again = codec::encode(reloaded.session.collection()).unwrap();
    assert_eq!(String::from_utf8(again).unwrap(), saved);
}

#[test]
fn test_missing_and_empty_files_load_empty() {
    let h = SessionHarness::new();
    assert!(h.session.collection().is_empty());

    let h = SessionHarness::with_contents(Config::default(), Some(""));
    assert!(h.session.collection().is_empty());

    let h = SessionHarness::with_contents(Config::default(), Some("null"));
    assert!(h.session.collection().is_empty());
}

fn record(id: i64, part: Option<&str>) -> serde_json::Value {
    json!({
        "Name": format!("P{}", id),
        "Coordinates": { "X": null, "Y": 0 },
        "Price": null,
        "PartNumber": part,
        "ManufactureCost": -2.0,
        "UnitOfMeasure": null,
        "Manufacturer": null,
        "Id": id,
        "CreationDate": "2024-01-01T00:00:00Z"
    })
}

#[test]
fn test_duplicate_record_rejects_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("products.json");
    let doc = json!([record(1, Some("A")), record(2, Some("A"))]);
    fs::write(&path, doc.to_string()).unwrap();

    let err = codec::load(&FileStore::new(&path), false).unwrap_err();
    assert!(format!("{:#}", err).contains("Record #2 was rejected"));
    let stock = err.downcast_ref::<StockError>().unwrap();
    assert_eq!(stock.field(), Some("partNumber"));
}

#[test]
fn test_skip_invalid_keeps_good_records() {
    let doc = json!([record(1, Some("A")), record(1, None), record(3, None)]).to_string();
    let mut config = Config::default();
    config.store.skip_invalid = true;

    let h = SessionHarness::with_contents(config, Some(&doc));
    assert_eq!(h.ids(), vec![1, 3]);
}

#[test]
fn test_save_replaces_previous_contents() {
    let doc = json!([record(1, None), record(2, None)]).to_string();
    let mut h = SessionHarness::with_contents(Config::default(), Some(&doc));
    h.run(&lines(&["remove_by_id 1", "save"]));

    let stored = h.stored();
    let ids: Vec<i64> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2]);
}
