//! Provider feed normalization.
//!
//! Upstream payloads are untrusted, loosely shaped JSON. This module
//! detects which provider schema a payload matches and maps it onto the
//! canonical [`EarthquakeRecord`] list; the raw shape never crosses this
//! boundary.
//!
//! | Shape | Parser |
//! |-------|--------|
//! | Wolfx/CENC object keyed by `No*` ordinals | [`wolfx::parse`] |
//! | USGS GeoJSON `FeatureCollection` | [`usgs::parse`] |
//!
//! Output ordering is canonical: descending by event time, records without
//! a usable time last. Parsing is deterministic; the same payload yields a
//! field-for-field identical list every time.

pub mod usgs;
pub mod wolfx;

use serde_json::Value;
use thiserror::Error;

use crate::domain::EarthquakeRecord;

/// Place sentinel for events whose location string is missing.
pub const UNKNOWN_PLACE: &str = "未知地点";

/// Feed payload errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The payload matched neither known provider schema.
    #[error("feed payload did not match any known provider schema: {reason}")]
    UnrecognizedShape { reason: String },
}

/// Normalize a raw provider payload into canonical records.
///
/// # Errors
///
/// [`FeedError::UnrecognizedShape`] when the payload is neither a Wolfx
/// ordinal-keyed object nor a GeoJSON `FeatureCollection`. Callers that
/// must not fail on a garbled feed (a live monitor) should map this to an
/// empty batch plus a logged diagnostic.
pub fn parse_provider_feed(raw: &Value) -> Result<Vec<EarthquakeRecord>, FeedError> {
    if looks_like_geojson(raw) {
        return Ok(usgs::parse(raw));
    }

    if looks_like_wolfx(raw) {
        return Ok(wolfx::parse(raw));
    }

    Err(FeedError::UnrecognizedShape {
        reason: describe_shape(raw),
    })
}

fn looks_like_geojson(raw: &Value) -> bool {
    raw.get("features").map_or(false, Value::is_array)
}

fn looks_like_wolfx(raw: &Value) -> bool {
    raw.as_object()
        .map_or(false, |map| map.keys().any(|key| key.starts_with("No")))
}

fn describe_shape(raw: &Value) -> String {
    match raw {
        Value::Object(map) => format!(
            "object with {} key(s), no 'features' array and no 'No*' ordinal keys",
            map.len()
        ),
        Value::Array(items) => format!("top-level array of {} item(s)", items.len()),
        other => format!("top-level {}", json_type_name(other)),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Sort records into canonical order: newest first, unknown times last.
/// Stable, so ties keep their relative input order.
pub(crate) fn sort_newest_first(records: &mut [EarthquakeRecord]) {
    records.sort_by(|a, b| match (a.occurred_at_ms, b.occurred_at_ms) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Coerce a loosely typed JSON field to f64, defaulting to 0.0.
///
/// Accepts numbers and numeric string prefixes ("12.5km" reads as 12.5,
/// matching the permissiveness of the upstream feeds' consumers). Never
/// yields NaN.
pub(crate) fn lenient_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => {
            let parsed = n.as_f64().unwrap_or(0.0);
            if parsed.is_finite() {
                parsed
            } else {
                0.0
            }
        }
        Some(Value::String(s)) => leading_float(s),
        _ => 0.0,
    }
}

fn leading_float(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    trimmed[..end].parse().unwrap_or(0.0)
}

/// Coerce a loosely typed JSON field to an owned string, if present.
pub(crate) fn lenient_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
