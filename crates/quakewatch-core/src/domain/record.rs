use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream feed that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Cenc,
    Usgs,
}

impl FeedSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cenc => "cenc",
            Self::Usgs => "usgs",
        }
    }
}

impl Display for FeedSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Magnitude class on the CENC descriptive scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeClass {
    /// M < 2.5
    Micro,
    /// 2.5 <= M < 3.5
    Minor,
    /// 3.5 <= M < 4.5
    Light,
    /// 4.5 <= M < 5.5
    Moderate,
    /// 5.5 <= M < 6.5
    Strong,
    /// 6.5 <= M < 7.0
    Major,
    /// M >= 7.0
    Great,
}

impl MagnitudeClass {
    pub fn for_magnitude(magnitude: f64) -> Self {
        if magnitude < 2.5 {
            Self::Micro
        } else if magnitude < 3.5 {
            Self::Minor
        } else if magnitude < 4.5 {
            Self::Light
        } else if magnitude < 5.5 {
            Self::Moderate
        } else if magnitude < 6.5 {
            Self::Strong
        } else if magnitude < 7.0 {
            Self::Major
        } else {
            Self::Great
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Micro => "微震",
            Self::Minor => "小震",
            Self::Light => "轻震",
            Self::Moderate => "中震",
            Self::Strong => "强震",
            Self::Major => "大震",
            Self::Great => "巨震",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Micro => "通常无感，仪器可记录",
            Self::Minor => "少数敏感者可能察觉",
            Self::Light => "室内大多数人可感觉",
            Self::Moderate => "普遍有感，物品摇晃",
            Self::Strong => "可能造成轻微破坏",
            Self::Major => "可能造成严重破坏",
            Self::Great => "毁灭性破坏",
        }
    }
}

/// Hypocenter depth class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthClass {
    /// < 70 km
    Shallow,
    /// 70 - 300 km
    Intermediate,
    /// >= 300 km
    Deep,
}

impl DepthClass {
    pub fn for_depth_km(depth_km: f64) -> Self {
        if depth_km < 70.0 {
            Self::Shallow
        } else if depth_km < 300.0 {
            Self::Intermediate
        } else {
            Self::Deep
        }
    }
}

/// Canonical earthquake event record.
///
/// One record per upstream event, normalized from whichever provider shape
/// produced it. Records are immutable once constructed; the classification
/// accessors derive their answers from the stored fields and never mutate.
///
/// Numeric fields the upstream failed to report are `0.0`, never NaN, so
/// downstream comparisons stay well defined. An unparseable event time is
/// `None`: such a record is excluded from date-bounded filtering but still
/// appears in unfiltered listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    /// Provider event id, or a synthesized key when the provider omits one.
    /// Unique within a fetch batch only.
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    /// Event time as Unix milliseconds UTC.
    pub occurred_at_ms: Option<i64>,
    pub depth_km: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Provider-reported intensity, passed through untouched.
    pub intensity: Option<String>,
    pub source: FeedSource,
}

impl EarthquakeRecord {
    /// Whether the record carries coordinates usable for spatial rendering.
    ///
    /// A 0/0 position means "not reported" in both upstream feeds and is
    /// treated as not mappable; out-of-range coordinates likewise.
    pub fn is_mappable(&self) -> bool {
        if self.latitude == 0.0 && self.longitude == 0.0 {
            return false;
        }
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn magnitude_class(&self) -> MagnitudeClass {
        MagnitudeClass::for_magnitude(self.magnitude)
    }

    pub fn depth_class(&self) -> DepthClass {
        DepthClass::for_depth_km(self.depth_km)
    }

    /// Whether the place string names a Chinese region.
    pub fn is_domestic(&self) -> bool {
        crate::classify::is_domestic(&self.place)
    }

    /// Province extracted from the place string.
    pub fn province(&self) -> &'static str {
        crate::classify::extract_province(&self.place)
    }
}
