//! USGS GeoJSON feed normalization and query URL construction.
//!
//! Summary feeds are a standard `FeatureCollection`;
//! `geometry.coordinates` is `[longitude, latitude, depth]` — longitude
//! first. `properties.time` is already Unix milliseconds.

use serde_json::Value;

use crate::domain::{EarthquakeRecord, FeedSource};
use crate::error::ValidationError;

use super::{lenient_f64, lenient_string, sort_newest_first, UNKNOWN_PLACE};

const API_BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";
const QUERY_BASE: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Direct upstream URL for the default all-day summary feed.
pub const DIRECT_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

/// Time window of a USGS summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPeriod {
    Hour,
    Day,
    Week,
    Month,
}

impl FeedPeriod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// URL of a fixed summary feed, optionally the significant-events variant.
pub fn feed_url(period: FeedPeriod, significant: bool) -> String {
    let prefix = if significant { "significant" } else { "all" };
    format!("{API_BASE}/{prefix}_{}.geojson", period.as_str())
}

/// Parameters for an fdsnws event query.
#[derive(Debug, Clone, PartialEq)]
pub struct UsgsQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub limit: u32,
}

impl Default for UsgsQuery {
    fn default() -> Self {
        Self {
            start_time: None,
            end_time: None,
            min_magnitude: 0.0,
            max_magnitude: 10.0,
            min_latitude: -90.0,
            max_latitude: 90.0,
            min_longitude: -180.0,
            max_longitude: 180.0,
            limit: 100,
        }
    }
}

impl UsgsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounding box covering mainland China and surrounding waters.
    pub fn china() -> Self {
        Self {
            min_latitude: 18.0,
            max_latitude: 54.0,
            min_longitude: 73.0,
            max_longitude: 135.0,
            limit: 200,
            ..Self::default()
        }
    }

    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvertedMagnitudeRange { min, max });
        }
        self.min_magnitude = min;
        self.max_magnitude = max;
        Ok(self)
    }

    pub fn with_time_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_time = start.map(str::to_string);
        self.end_time = end.map(str::to_string);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Build the fdsnws query URL, ordered by time.
    pub fn to_url(&self) -> String {
        let mut params = vec![
            ("format", String::from("geojson")),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("maxmagnitude", self.max_magnitude.to_string()),
            ("minlatitude", self.min_latitude.to_string()),
            ("maxlatitude", self.max_latitude.to_string()),
            ("minlongitude", self.min_longitude.to_string()),
            ("maxlongitude", self.max_longitude.to_string()),
            ("limit", self.limit.to_string()),
            ("orderby", String::from("time")),
        ];

        if let Some(start) = &self.start_time {
            params.push(("starttime", start.clone()));
        }
        if let Some(end) = &self.end_time {
            params.push(("endtime", end.clone()));
        }

        let query = params
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{QUERY_BASE}?{query}")
    }
}

/// Map a USGS `FeatureCollection` onto canonical records, newest first.
pub fn parse(raw: &Value) -> Vec<EarthquakeRecord> {
    let Some(features) = raw.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut records: Vec<EarthquakeRecord> = features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature))
        .collect();

    sort_newest_first(&mut records);
    records
}

fn parse_feature(index: usize, feature: &Value) -> EarthquakeRecord {
    let properties = feature.get("properties");
    let prop = |name: &str| properties.and_then(|p| p.get(name));

    // geometry.coordinates is [longitude, latitude, depth].
    let coordinates = feature
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array);
    let coordinate = |position: usize| coordinates.and_then(|c| c.get(position));

    let id = feature
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| prop("code").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("usgs-{index}"));

    let place = prop("place")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_PLACE);

    EarthquakeRecord {
        id,
        magnitude: lenient_f64(prop("mag")),
        place: place.to_string(),
        occurred_at_ms: prop("time").and_then(Value::as_i64),
        depth_km: lenient_f64(coordinate(2)),
        latitude: lenient_f64(coordinate(1)),
        longitude: lenient_f64(coordinate(0)),
        intensity: lenient_string(prop("mmi")),
        source: FeedSource::Usgs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(id: &str, mag: f64, time: i64, coordinates: Value) -> Value {
        json!({
            "type": "Feature",
            "id": id,
            "properties": { "mag": mag, "place": "10 km NE of Ridgecrest, CA", "time": time },
            "geometry": { "type": "Point", "coordinates": coordinates }
        })
    }

    #[test]
    fn coordinates_are_longitude_first() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [feature("us1", 4.5, 1_700_000_000_000, json!([-117.6, 35.7, 8.2]))]
        });

        let records = parse(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].longitude, -117.6);
        assert_eq!(records[0].latitude, 35.7);
        assert_eq!(records[0].depth_km, 8.2);
    }

    #[test]
    fn feature_time_is_already_epoch_millis() {
        let payload = json!({
            "features": [feature("us1", 4.5, 1_700_000_000_000, json!([0.5, 0.5, 10.0]))]
        });

        assert_eq!(parse(&payload)[0].occurred_at_ms, Some(1_700_000_000_000));
    }

    #[test]
    fn missing_id_is_synthesized_never_dropped() {
        let payload = json!({
            "features": [
                { "properties": { "mag": 1.0, "time": 5 } },
                { "properties": { "mag": 2.0, "time": 9, "code": "abc" } }
            ]
        });

        let records = parse(&payload);
        assert_eq!(records.len(), 2);
        // Sorted newest first: time 9 carries the provider code.
        assert_eq!(records[0].id, "abc");
        assert_eq!(records[1].id, "usgs-0");
    }

    #[test]
    fn truncated_coordinates_default_to_zero() {
        let payload = json!({
            "features": [{ "properties": { "time": 1 }, "geometry": { "coordinates": [12.0] } }]
        });

        let record = &parse(&payload)[0];
        assert_eq!(record.longitude, 12.0);
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.depth_km, 0.0);
        assert!(!record.is_mappable());
    }

    #[test]
    fn output_is_sorted_newest_first() {
        let payload = json!({
            "features": [
                feature("old", 1.0, 100, json!([1.0, 1.0, 1.0])),
                feature("new", 1.0, 300, json!([1.0, 1.0, 1.0])),
                feature("mid", 1.0, 200, json!([1.0, 1.0, 1.0]))
            ]
        });

        let records = parse(&payload);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn summary_feed_urls() {
        assert_eq!(
            feed_url(FeedPeriod::Day, false),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
        );
        assert_eq!(
            feed_url(FeedPeriod::Week, true),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_week.geojson"
        );
        assert_eq!(feed_url(FeedPeriod::Day, false), DIRECT_URL);
    }

    #[test]
    fn query_url_includes_bounds_and_time_range() {
        let url = UsgsQuery::china()
            .with_magnitude_range(3.0, 8.0)
            .unwrap()
            .with_time_range(Some("2024-01-01"), Some("2024-01-31"))
            .to_url();

        assert!(url.starts_with("https://earthquake.usgs.gov/fdsnws/event/1/query?"));
        assert!(url.contains("format=geojson"));
        assert!(url.contains("minmagnitude=3"));
        assert!(url.contains("maxmagnitude=8"));
        assert!(url.contains("minlatitude=18"));
        assert!(url.contains("maxlongitude=135"));
        assert!(url.contains("limit=200"));
        assert!(url.contains("orderby=time"));
        assert!(url.contains("starttime=2024-01-01"));
        assert!(url.contains("endtime=2024-01-31"));
    }
}
