//! Behavior tests for filtering, sorting, and statistics over a merged
//! two-feed batch.

use quakewatch_core::{query, stats};
use serde_json::Value;

use quakewatch_tests::*;

fn merged_batch() -> Vec<EarthquakeRecord> {
    let wolfx_raw: Value = serde_json::from_str(&wolfx_single_event()).unwrap();
    let usgs_raw: Value = serde_json::from_str(&usgs_single_feature()).unwrap();

    let mut batch = parse_provider_feed(&wolfx_raw).unwrap();
    batch.extend(parse_provider_feed(&usgs_raw).unwrap());
    query::sort(&batch, SortKey::TimeDesc)
}

#[test]
fn merged_feeds_share_one_canonical_shape() {
    let batch = merged_batch();

    assert_eq!(batch.len(), 2);
    // USGS feature at 1_704_100_000_000 is newer than the CENC event at
    // midnight UTC the same day.
    assert_eq!(batch[0].source, FeedSource::Usgs);
    assert_eq!(batch[1].source, FeedSource::Cenc);
}

#[test]
fn magnitude_filter_spans_both_feeds() {
    let batch = merged_batch();

    let criteria = FilterCriteria::new().with_magnitude_range(5.0, 10.0).unwrap();
    let kept = query::filter(&batch, &criteria);

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "evt1");
}

#[test]
fn domestic_scope_keeps_only_chinese_regions() {
    let batch = merged_batch();

    let kept = query::filter(
        &batch,
        &FilterCriteria::new().with_scope(RegionScope::DomesticOnly),
    );

    assert_eq!(kept.len(), 1);
    assert!(kept[0].is_domestic());
}

#[test]
fn date_window_is_inclusive_on_both_ends() {
    let batch = merged_batch();

    let criteria = FilterCriteria::new()
        .with_start_date("2024-01-01")
        .unwrap()
        .with_end_date("2024-01-01")
        .unwrap();

    // Both events fall on 2024-01-01 UTC.
    assert_eq!(query::filter(&batch, &criteria).len(), 2);
}

#[test]
fn statistics_over_the_merged_batch() {
    let batch = merged_batch();

    let summary = stats::compute_stats(&batch);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.max_magnitude, 5.2);
    assert!((summary.avg_magnitude - 4.85).abs() < 1e-9);
    assert!((summary.avg_depth - 9.1).abs() < 1e-9);
}

#[test]
fn distributions_cover_every_record_exactly_once() {
    let batch = merged_batch();

    let magnitude_total: usize = stats::magnitude_distribution(&batch)
        .iter()
        .map(|b| b.count)
        .sum();
    let depth_total: usize = stats::depth_distribution(&batch)
        .iter()
        .map(|b| b.count)
        .sum();

    assert_eq!(magnitude_total, batch.len());
    assert_eq!(depth_total, batch.len());
}

#[test]
fn daily_counts_use_utc_days() {
    let batch = merged_batch();

    let daily = stats::time_distribution(&batch);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].date, "2024-01-01");
    assert_eq!(daily[0].count, 2);
}

#[test]
fn region_counts_strip_usgs_distance_prefixes() {
    let batch = merged_batch();

    let regions = stats::region_distribution(&batch);
    assert!(regions.iter().any(|r| r.region == "Ridgecrest, CA"));
    assert!(regions.iter().any(|r| r.region == "四川甘孜州"));
}

#[test]
fn empty_filter_result_yields_zeroed_statistics() {
    let batch = merged_batch();

    let criteria = FilterCriteria::new().with_magnitude_range(9.0, 10.0).unwrap();
    let kept = query::filter(&batch, &criteria);
    let summary = stats::compute_stats(&kept);

    assert_eq!(summary.total, 0);
    assert_eq!(summary.max_magnitude, 0.0);
    assert_eq!(summary.avg_magnitude, 0.0);
    assert_eq!(summary.avg_depth, 0.0);
}
