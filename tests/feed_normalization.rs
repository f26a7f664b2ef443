//! Behavior tests for provider payload normalization and classification.

use quakewatch_core::classify;
use serde_json::{json, Value};

use quakewatch_tests::*;

#[test]
fn wolfx_payload_maps_onto_canonical_records() {
    let raw: Value = serde_json::from_str(&wolfx_single_event()).unwrap();

    let records = parse_provider_feed(&raw).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "evt1");
    assert_eq!(record.magnitude, 5.2);
    assert_eq!(record.place, "四川甘孜州");
    // 2024-01-01 08:00:00 Beijing time is midnight UTC.
    assert_eq!(record.occurred_at_ms, Some(1_704_067_200_000));
    assert_eq!(record.depth_km, 10.0);
    assert_eq!(record.source, FeedSource::Cenc);
}

#[test]
fn wolfx_non_ordinal_keys_are_ignored() {
    // The md5 checksum key must not become a phantom event.
    let raw: Value = serde_json::from_str(&wolfx_single_event()).unwrap();
    assert!(raw.get("md5").is_some());

    let records = parse_provider_feed(&raw).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn wolfx_missing_fields_degrade_to_defaults_not_errors() {
    let raw = json!({
        "No1": { "time": "garbage", "magnitude": "not a number" }
    });

    let records = parse_provider_feed(&raw).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "No1"); // key stands in for the missing EventID
    assert_eq!(record.magnitude, 0.0);
    assert_eq!(record.place, "未知地点");
    assert_eq!(record.occurred_at_ms, None);
}

#[test]
fn usgs_payload_maps_onto_canonical_records() {
    let raw: Value = serde_json::from_str(&usgs_single_feature()).unwrap();

    let records = parse_provider_feed(&raw).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "us7000abcd");
    assert_eq!(record.longitude, -117.6);
    assert_eq!(record.latitude, 35.7);
    assert_eq!(record.depth_km, 8.2);
    assert_eq!(record.occurred_at_ms, Some(1_704_100_000_000));
    assert_eq!(record.intensity.as_deref(), Some("3.4"));
    assert_eq!(record.source, FeedSource::Usgs);
}

#[test]
fn normalization_is_deterministic() {
    let raw: Value = serde_json::from_str(&wolfx_single_event()).unwrap();

    let first = parse_provider_feed(&raw).unwrap();
    let second = parse_provider_feed(&raw).unwrap();

    assert_eq!(first, second);
}

#[test]
fn mixed_batch_output_is_newest_first() {
    let raw = json!({
        "No1": { "EventID": "old", "time": "2024-01-01 08:00:00", "magnitude": "3" },
        "No2": { "EventID": "new", "time": "2024-01-02 08:00:00", "magnitude": "4" },
        "No3": { "EventID": "dateless", "magnitude": "5" }
    });

    let records = parse_provider_feed(&raw).unwrap();

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    // Unknown times sort last.
    assert_eq!(ids, vec!["new", "old", "dateless"]);
}

#[test]
fn unrecognized_payloads_are_rejected_with_a_reason() {
    let error = parse_provider_feed(&json!({"foo": "bar"})).unwrap_err();
    assert!(!error.to_string().is_empty());
}

#[test]
fn classification_partitions_a_mixed_batch_completely() {
    let wolfx_raw: Value = serde_json::from_str(&wolfx_single_event()).unwrap();
    let usgs_raw: Value = serde_json::from_str(&usgs_single_feature()).unwrap();

    let mut batch = parse_provider_feed(&wolfx_raw).unwrap();
    batch.extend(parse_provider_feed(&usgs_raw).unwrap());

    let partition = classify::classify(&batch);

    assert_eq!(partition.domestic.len(), 1);
    assert_eq!(partition.overseas.len(), 1);
    assert_eq!(partition.domestic[0].place, "四川甘孜州");
    assert_eq!(partition.domestic[0].province(), "四川");
    assert_eq!(partition.overseas[0].province(), "未知");
}
