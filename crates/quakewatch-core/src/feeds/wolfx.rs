//! Wolfx CENC feed normalization.
//!
//! The upstream payload is a JSON object keyed by ordinal labels (`No1`,
//! `No2`, ...); each value is a loosely typed event with `time`/`ReportTime`,
//! `magnitude`, `location`/`placeName`, `depth`, `latitude`, `longitude`,
//! `EventID` and optionally `intensity`. Numeric fields may arrive as
//! strings.

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::domain::{EarthquakeRecord, FeedSource};

use super::{lenient_f64, lenient_string, sort_newest_first, UNKNOWN_PLACE};

/// Direct upstream URL for the CENC event list.
pub const DIRECT_URL: &str = "https://api.wolfx.jp/cenc_eqlist.json";

/// CENC report times carry no zone marker and are Beijing time (UTC+8).
const CENC_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const ISO_LOCAL_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Map a Wolfx payload onto canonical records, newest first.
///
/// Permissive by design: unparseable magnitude/depth/coordinates become
/// 0.0, a missing event id falls back to the ordinal key, a missing place
/// becomes the unknown-location sentinel, and an unparseable time leaves
/// `occurred_at_ms` unset rather than dropping the record.
pub fn parse(raw: &Value) -> Vec<EarthquakeRecord> {
    let Some(map) = raw.as_object() else {
        return Vec::new();
    };

    let mut records: Vec<EarthquakeRecord> = map
        .iter()
        .filter(|(key, _)| key.starts_with("No"))
        .map(|(key, item)| parse_event(key, item))
        .collect();

    sort_newest_first(&mut records);
    records
}

fn parse_event(key: &str, item: &Value) -> EarthquakeRecord {
    let time_field = item
        .get("time")
        .and_then(Value::as_str)
        .or_else(|| item.get("ReportTime").and_then(Value::as_str));

    let place = item
        .get("location")
        .and_then(Value::as_str)
        .or_else(|| item.get("placeName").and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_PLACE);

    let id = item
        .get("EventID")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(key);

    EarthquakeRecord {
        id: id.to_string(),
        magnitude: lenient_f64(item.get("magnitude")),
        place: place.to_string(),
        occurred_at_ms: time_field.and_then(parse_event_time),
        depth_km: lenient_f64(item.get("depth")),
        latitude: lenient_f64(item.get("latitude")),
        longitude: lenient_f64(item.get("longitude")),
        intensity: lenient_string(item.get("intensity")),
        source: FeedSource::Cenc,
    }
}

fn parse_event_time(value: &str) -> Option<i64> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some((parsed.unix_timestamp_nanos() / 1_000_000) as i64);
    }

    if let Ok(parsed) = PrimitiveDateTime::parse(value, CENC_FORMAT) {
        return Some(parsed.assume_offset(offset!(+8)).unix_timestamp() * 1000);
    }

    if let Ok(parsed) = PrimitiveDateTime::parse(value, ISO_LOCAL_FORMAT) {
        return Some(parsed.assume_utc().unix_timestamp() * 1000);
    }

    None
}
