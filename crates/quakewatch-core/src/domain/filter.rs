use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::error::ValidationError;

/// Domestic/overseas constraint for a query.
///
/// The two constraints are mutually exclusive, so they are a single tagged
/// variant rather than a pair of booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionScope {
    #[default]
    All,
    DomesticOnly,
    OverseasOnly,
}

/// Quick date-range preset, computed relative to "now" or to the selected
/// end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickRange {
    Day,
    Week,
    Month,
}

impl QuickRange {
    pub const fn duration_ms(self) -> i64 {
        const DAY_MS: i64 = 24 * 60 * 60 * 1000;
        match self {
            Self::Day => DAY_MS,
            Self::Week => 7 * DAY_MS,
            Self::Month => 30 * DAY_MS,
        }
    }
}

impl FromStr for QuickRange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(ValidationError::InvalidQuickRange {
                value: other.to_string(),
            }),
        }
    }
}

/// Sort order for record listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    TimeDesc,
    TimeAsc,
    MagDesc,
    MagAsc,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeDesc => "time-desc",
            Self::TimeAsc => "time-asc",
            Self::MagDesc => "mag-desc",
            Self::MagAsc => "mag-asc",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "time-desc" => Ok(Self::TimeDesc),
            "time-asc" => Ok(Self::TimeAsc),
            "mag-desc" => Ok(Self::MagDesc),
            "mag-asc" => Ok(Self::MagAsc),
            other => Err(ValidationError::InvalidSortKey {
                value: other.to_string(),
            }),
        }
    }
}

/// Ephemeral query criteria applied to a record batch.
///
/// All predicates are AND-combined. Date bounds are inclusive Unix
/// milliseconds; records with no usable event time are excluded whenever a
/// date bound is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub start_time_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
    pub scope: RegionScope,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_magnitude: 0.0,
            max_magnitude: 10.0,
            start_time_ms: None,
            end_time_ms: None,
            scope: RegionScope::All,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvertedMagnitudeRange { min, max });
        }
        self.min_magnitude = min;
        self.max_magnitude = max;
        Ok(self)
    }

    pub fn with_scope(mut self, scope: RegionScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the lower date bound from an ISO `YYYY-MM-DD` string
    /// (midnight UTC).
    pub fn with_start_date(mut self, date: &str) -> Result<Self, ValidationError> {
        self.start_time_ms = Some(start_of_day_ms(date)?);
        self.check_date_order()
    }

    /// Set the upper date bound from an ISO `YYYY-MM-DD` string, inclusive
    /// through 23:59:59.999 UTC.
    pub fn with_end_date(mut self, date: &str) -> Result<Self, ValidationError> {
        self.end_time_ms = Some(end_of_day_ms(date)?);
        self.check_date_order()
    }

    /// Set the lower bound to a quick preset, anchored at the selected end
    /// date when one is present, otherwise at `now_ms`.
    pub fn with_quick_range(mut self, range: QuickRange, now_ms: i64) -> Self {
        let anchor = self.end_time_ms.unwrap_or(now_ms);
        self.start_time_ms = Some(anchor - range.duration_ms());
        self
    }

    pub fn has_date_bound(&self) -> bool {
        self.start_time_ms.is_some() || self.end_time_ms.is_some()
    }

    fn check_date_order(self) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (self.start_time_ms, self.end_time_ms) {
            if start > end {
                return Err(ValidationError::InvertedDateRange);
            }
        }
        Ok(self)
    }
}

const DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

fn parse_date(value: &str) -> Result<Date, ValidationError> {
    Date::parse(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

fn start_of_day_ms(value: &str) -> Result<i64, ValidationError> {
    let date = parse_date(value)?;
    Ok(PrimitiveDateTime::new(date, time::Time::MIDNIGHT)
        .assume_utc()
        .unix_timestamp()
        * 1000)
}

fn end_of_day_ms(value: &str) -> Result<i64, ValidationError> {
    let date = parse_date(value)?;
    let end = date
        .with_hms_milli(23, 59, 59, 999)
        .map_err(|_| ValidationError::InvalidDate {
            value: value.to_string(),
        })?;
    Ok((end.assume_utc().unix_timestamp_nanos() / 1_000_000) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_round_trips() {
        for key in ["time-desc", "time-asc", "mag-desc", "mag-asc"] {
            assert_eq!(key.parse::<SortKey>().unwrap().as_str(), key);
        }
        assert!(matches!(
            "newest".parse::<SortKey>(),
            Err(ValidationError::InvalidSortKey { .. })
        ));
    }

    #[test]
    fn end_date_is_inclusive_through_end_of_day() {
        let criteria = FilterCriteria::new().with_end_date("2024-01-01").unwrap();
        // 2024-01-01T23:59:59.999Z
        assert_eq!(criteria.end_time_ms, Some(1_704_153_599_999));
    }

    #[test]
    fn start_date_is_midnight_utc() {
        let criteria = FilterCriteria::new().with_start_date("2024-01-01").unwrap();
        assert_eq!(criteria.start_time_ms, Some(1_704_067_200_000));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let result = FilterCriteria::new()
            .with_start_date("2024-02-01")
            .unwrap()
            .with_end_date("2024-01-01");
        assert!(matches!(result, Err(ValidationError::InvertedDateRange)));
    }

    #[test]
    fn quick_range_anchors_at_end_date_when_present() {
        let now = 10 * QuickRange::Month.duration_ms();
        let criteria = FilterCriteria::new()
            .with_end_date("2024-01-01")
            .unwrap()
            .with_quick_range(QuickRange::Day, now);
        assert_eq!(
            criteria.start_time_ms,
            Some(1_704_153_599_999 - QuickRange::Day.duration_ms())
        );
    }

    #[test]
    fn quick_range_anchors_at_now_without_end_date() {
        let criteria = FilterCriteria::new().with_quick_range(QuickRange::Week, 1_000_000_000);
        assert_eq!(
            criteria.start_time_ms,
            Some(1_000_000_000 - 7 * 24 * 60 * 60 * 1000)
        );
    }

    #[test]
    fn inverted_magnitude_range_is_rejected() {
        assert!(matches!(
            FilterCriteria::new().with_magnitude_range(5.0, 3.0),
            Err(ValidationError::InvertedMagnitudeRange { .. })
        ));
    }

    #[test]
    fn garbage_date_is_rejected() {
        assert!(matches!(
            FilterCriteria::new().with_start_date("01/02/2024"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }
}
