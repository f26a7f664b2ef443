//! Aggregate statistics and distributions over record batches.
//!
//! All functions are pure and total: malformed individual records were
//! already normalized to safe defaults upstream, and empty input yields
//! zeroed aggregates rather than NaN or a panic — consumers rely on the
//! "empty state is zero" contract instead of guarding division themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::domain::EarthquakeRecord;

/// Headline aggregates for a record batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ListStats {
    pub total: usize,
    pub max_magnitude: f64,
    pub avg_magnitude: f64,
    pub avg_depth: f64,
}

/// One histogram bucket: lower-inclusive, upper-exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub label: &'static str,
    pub range_min: f64,
    pub range_max: f64,
    pub count: usize,
}

/// Events per UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub count: usize,
}

/// Events per extracted region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
}

/// Compute headline aggregates. Empty input returns all zeros.
pub fn compute_stats(records: &[EarthquakeRecord]) -> ListStats {
    if records.is_empty() {
        return ListStats::default();
    }

    let total = records.len();
    let max_magnitude = records
        .iter()
        .map(|r| r.magnitude)
        .fold(f64::NEG_INFINITY, f64::max);
    let avg_magnitude = records.iter().map(|r| r.magnitude).sum::<f64>() / total as f64;
    let avg_depth = records.iter().map(|r| r.depth_km).sum::<f64>() / total as f64;

    ListStats {
        total,
        max_magnitude,
        avg_magnitude,
        avg_depth,
    }
}

const MAGNITUDE_RANGES: &[(f64, f64, &str)] = &[
    (0.0, 2.0, "< 2.0"),
    (2.0, 3.0, "2.0-2.9"),
    (3.0, 4.0, "3.0-3.9"),
    (4.0, 5.0, "4.0-4.9"),
    (5.0, 6.0, "5.0-5.9"),
    (6.0, 7.0, "6.0-6.9"),
    (7.0, 10.0, ">= 7.0"),
];

const DEPTH_RANGES: &[(f64, f64, &str)] = &[
    (0.0, 10.0, "0-10km"),
    (10.0, 35.0, "10-35km"),
    (35.0, 70.0, "35-70km"),
    (70.0, 150.0, "70-150km"),
    (150.0, 300.0, "150-300km"),
    (300.0, 1000.0, "> 300km"),
];

fn bucket_counts(
    ranges: &'static [(f64, f64, &'static str)],
    values: impl Iterator<Item = f64>,
) -> Vec<DistributionBucket> {
    let mut buckets: Vec<DistributionBucket> = ranges
        .iter()
        .map(|&(range_min, range_max, label)| DistributionBucket {
            label,
            range_min,
            range_max,
            count: 0,
        })
        .collect();

    for value in values {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| value >= b.range_min && value < b.range_max)
        {
            bucket.count += 1;
        }
    }

    buckets
}

/// Histogram over fixed magnitude boundaries 2, 3, 4, 5, 6, 7.
/// A record lands in exactly one bucket, or none if out of range.
pub fn magnitude_distribution(records: &[EarthquakeRecord]) -> Vec<DistributionBucket> {
    bucket_counts(MAGNITUDE_RANGES, records.iter().map(|r| r.magnitude))
}

/// Histogram over fixed depth boundaries 10, 35, 70, 150, 300 km.
pub fn depth_distribution(records: &[EarthquakeRecord]) -> Vec<DistributionBucket> {
    bucket_counts(DEPTH_RANGES, records.iter().map(|r| r.depth_km))
}

const DAY_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Events bucketed by UTC calendar day, ascending by date. Records without
/// a usable time are skipped.
pub fn time_distribution(records: &[EarthquakeRecord]) -> Vec<DailyCount> {
    let mut daily: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let Some(occurred_at) = record.occurred_at_ms else {
            continue;
        };
        let Ok(moment) = OffsetDateTime::from_unix_timestamp_nanos(occurred_at as i128 * 1_000_000)
        else {
            continue;
        };
        let Ok(date) = moment.format(DAY_FORMAT) else {
            continue;
        };
        *daily.entry(date).or_insert(0) += 1;
    }

    daily
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Top-10 regions by event count, descending; ties break ascending by
/// region name for determinism.
///
/// USGS place strings like "10 km NE of Ridgecrest, CA" are reduced to the
/// part after "of"; anything else is used whole.
pub fn region_distribution(records: &[EarthquakeRecord]) -> Vec<RegionCount> {
    let mut regions: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        *regions.entry(region_of(&record.place)).or_insert(0) += 1;
    }

    let mut counts: Vec<RegionCount> = regions
        .into_iter()
        .map(|(region, count)| RegionCount {
            region: region.to_string(),
            count,
        })
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(10);
    counts
}

fn region_of(place: &str) -> &str {
    for (position, _) in place.match_indices("of") {
        let rest = &place[position + 2..];
        let trimmed = rest.trim_start();
        if trimmed.len() < rest.len() && !trimmed.is_empty() {
            return trimmed;
        }
    }
    place
}
