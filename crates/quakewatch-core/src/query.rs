//! Pure filter and sort operations over record batches.

use crate::classify::is_domestic;
use crate::domain::{EarthquakeRecord, FilterCriteria, RegionScope, SortKey};

/// Keep records satisfying every predicate in `criteria` (AND-combined).
///
/// Records without a usable event time are excluded whenever a date bound
/// is active, but pass freely otherwise.
pub fn filter(records: &[EarthquakeRecord], criteria: &FilterCriteria) -> Vec<EarthquakeRecord> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

fn matches(record: &EarthquakeRecord, criteria: &FilterCriteria) -> bool {
    if record.magnitude < criteria.min_magnitude || record.magnitude > criteria.max_magnitude {
        return false;
    }

    if criteria.has_date_bound() {
        let Some(occurred_at) = record.occurred_at_ms else {
            return false;
        };
        if let Some(start) = criteria.start_time_ms {
            if occurred_at < start {
                return false;
            }
        }
        if let Some(end) = criteria.end_time_ms {
            if occurred_at > end {
                return false;
            }
        }
    }

    match criteria.scope {
        RegionScope::All => true,
        RegionScope::DomesticOnly => is_domestic(&record.place),
        RegionScope::OverseasOnly => !is_domestic(&record.place),
    }
}

/// Return a copy of `records` in the given order. Stable: ties keep their
/// original relative order.
pub fn sort(records: &[EarthquakeRecord], key: SortKey) -> Vec<EarthquakeRecord> {
    let mut sorted = records.to_vec();

    // Unknown times sort last regardless of direction.
    match key {
        SortKey::TimeDesc => sorted.sort_by_key(|r| {
            (
                r.occurred_at_ms.is_none(),
                std::cmp::Reverse(r.occurred_at_ms.unwrap_or(0)),
            )
        }),
        SortKey::TimeAsc => {
            sorted.sort_by_key(|r| (r.occurred_at_ms.is_none(), r.occurred_at_ms.unwrap_or(0)));
        }
        SortKey::MagDesc => sorted.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude)),
        SortKey::MagAsc => sorted.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude)),
    }

    sorted
}
