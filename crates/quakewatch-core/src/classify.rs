//! Domestic/overseas classification of place strings.
//!
//! Keyword substring matching, not NLP: a place string is domestic iff it
//! contains any Chinese region keyword. False positives are possible when a
//! keyword happens to substring-match an unrelated place name; that is the
//! accepted contract, preserved exactly, not a bug to fix.

use crate::domain::EarthquakeRecord;

/// Chinese region keywords: provinces, municipalities, autonomous regions,
/// SARs, and South China Sea island groups.
pub const DOMESTIC_KEYWORDS: &[&str] = &[
    "北京", "天津", "上海", "重庆",
    "河北", "山西", "辽宁", "吉林", "黑龙江",
    "江苏", "浙江", "安徽", "福建", "江西", "山东",
    "河南", "湖北", "湖南", "广东", "海南",
    "四川", "贵州", "云南", "陕西", "甘肃",
    "青海", "台湾", "内蒙古", "广西", "西藏", "宁夏", "新疆",
    "香港", "澳门", "西沙", "南沙", "中沙", "黄岩岛",
];

const MUNICIPALITIES: &[&str] = &["北京", "天津", "上海", "重庆"];

const PROVINCES: &[&str] = &[
    "河北", "山西", "辽宁", "吉林", "黑龙江", "江苏", "浙江", "安徽", "福建", "江西", "山东",
    "河南", "湖北", "湖南", "广东", "海南", "四川", "贵州", "云南", "陕西", "甘肃", "青海",
    "台湾",
];

const AUTONOMOUS_REGIONS: &[&str] = &["内蒙古", "广西", "西藏", "宁夏", "新疆"];

const SPECIAL_REGIONS: &[&str] = &["香港", "澳门"];

/// Fallback province label for domestic places no prefix pattern matched.
pub const DOMESTIC_FALLBACK: &str = "国内";

/// Province label for empty or non-domestic places.
pub const UNKNOWN_PROVINCE: &str = "未知";

/// Whether `place` names a Chinese region (substring containment).
pub fn is_domestic(place: &str) -> bool {
    if place.is_empty() {
        return false;
    }
    DOMESTIC_KEYWORDS
        .iter()
        .any(|keyword| place.contains(keyword))
}

/// Extract the province from a place string.
///
/// Ordered start-anchored prefix groups: municipalities, provinces,
/// autonomous regions, SARs. First match wins. A domestic place with no
/// matching prefix yields [`DOMESTIC_FALLBACK`]; anything else yields
/// [`UNKNOWN_PROVINCE`].
pub fn extract_province(place: &str) -> &'static str {
    if place.is_empty() {
        return UNKNOWN_PROVINCE;
    }

    for group in [MUNICIPALITIES, PROVINCES, AUTONOMOUS_REGIONS, SPECIAL_REGIONS] {
        for name in group {
            if place.starts_with(name) {
                return name;
            }
        }
    }

    if is_domestic(place) {
        DOMESTIC_FALLBACK
    } else {
        UNKNOWN_PROVINCE
    }
}

/// Records partitioned by domestic classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub domestic: Vec<EarthquakeRecord>,
    pub overseas: Vec<EarthquakeRecord>,
}

/// Partition records by [`is_domestic`]. Every input record lands in
/// exactly one side; relative order is preserved within each side.
pub fn classify(records: &[EarthquakeRecord]) -> Partition {
    let mut partition = Partition::default();

    for record in records {
        if is_domestic(&record.place) {
            partition.domestic.push(record.clone());
        } else {
            partition.overseas.push(record.clone());
        }
    }

    partition
}
