//! Seismic calculations: distance, intensity, energy, wave arrival.
//!
//! Simplified textbook formulas suitable for a monitoring dashboard, not
//! for hazard assessment.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates (haversine).
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Estimated intensity at a distance from the epicenter, on a simplified
/// 1..=12 Mercalli-like scale.
///
/// Peak intensity is `1.5 * magnitude - 1`, attenuated by
/// `2 * log10(distance / 10)` beyond 10 km.
pub fn estimated_intensity(magnitude: f64, distance_km: f64) -> u8 {
    let mut intensity = 1.5 * magnitude - 1.0;

    if distance_km > 0.0 {
        let attenuation = (distance_km / 10.0).log10() * 2.0;
        intensity -= attenuation.max(0.0);
    }

    intensity.round().clamp(1.0, 12.0) as u8
}

/// One step of the 12-degree intensity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityLevel {
    pub level: u8,
    /// Roman numeral label.
    pub label: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const INTENSITY_SCALE: [IntensityLevel; 12] = [
    IntensityLevel { level: 1, label: "I", name: "无感", description: "仅仪器记录" },
    IntensityLevel { level: 2, label: "II", name: "微感", description: "极少数静止者有感" },
    IntensityLevel { level: 3, label: "III", name: "轻感", description: "室内少数人有感" },
    IntensityLevel { level: 4, label: "IV", name: "有感", description: "室内多数人有感" },
    IntensityLevel { level: 5, label: "V", name: "强感", description: "室外少数人有感" },
    IntensityLevel { level: 6, label: "VI", name: "轻震", description: "器皿作响、悬挂物摇摆" },
    IntensityLevel { level: 7, label: "VII", name: "中震", description: "房屋轻微损坏" },
    IntensityLevel { level: 8, label: "VIII", name: "强震", description: "房屋严重损坏" },
    IntensityLevel { level: 9, label: "IX", name: "烈震", description: "房屋倒塌、地面开裂" },
    IntensityLevel { level: 10, label: "X", name: "大震", description: "建筑物普遍毁坏" },
    IntensityLevel { level: 11, label: "XI", name: "巨震", description: "灾难性破坏" },
    IntensityLevel { level: 12, label: "XII", name: "毁灭", description: "彻底毁灭" },
];

/// Descriptor for an intensity level; out-of-range input is clamped.
pub fn intensity_scale(level: u8) -> IntensityLevel {
    let index = level.clamp(1, 12) as usize - 1;
    INTENSITY_SCALE[index]
}

/// Released energy for a magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub joules: f64,
    pub tons_tnt: f64,
    pub display_value: String,
    pub display_unit: &'static str,
}

/// Gutenberg-Richter energy: `log10(E) = 4.8 + 1.5 * M` (joules), with a
/// TNT-equivalent banded for display.
pub fn energy(magnitude: f64) -> Energy {
    let joules = 10f64.powf(4.8 + 1.5 * magnitude);
    let tons_tnt = joules / 4.184e9;

    let (display_value, display_unit) = if tons_tnt < 1.0 {
        (format!("{:.2}", tons_tnt * 1000.0), "kg TNT")
    } else if tons_tnt < 1000.0 {
        (format!("{tons_tnt:.2}"), "吨 TNT")
    } else if tons_tnt < 1e6 {
        (format!("{:.2}", tons_tnt / 1000.0), "千吨 TNT")
    } else if tons_tnt < 1e9 {
        (format!("{:.2}", tons_tnt / 1e6), "百万吨 TNT")
    } else {
        (format!("{:.2}", tons_tnt / 1e9), "十亿吨 TNT")
    };

    Energy {
        joules,
        tons_tnt,
        display_value,
        display_unit,
    }
}

/// Radius within which shaking reaches `intensity_threshold`, in km.
/// Zero when the peak intensity is below the threshold.
pub fn impact_radius_km(magnitude: f64, intensity_threshold: f64) -> f64 {
    let peak_intensity = 1.5 * magnitude - 1.0;
    let intensity_drop = peak_intensity - intensity_threshold;

    if intensity_drop <= 0.0 {
        return 0.0;
    }

    10f64.powf(intensity_drop / 2.0 + 1.0)
}

/// P/S wave arrival estimate at a distance from the hypocenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveArrival {
    pub p_wave_secs: f64,
    pub s_wave_secs: f64,
    /// Warning window between P and S arrival.
    pub gap_secs: f64,
}

const P_WAVE_SPEED_KM_S: f64 = 6.5;
const S_WAVE_SPEED_KM_S: f64 = 3.7;

pub fn wave_arrival(distance_km: f64) -> WaveArrival {
    let p_wave_secs = distance_km / P_WAVE_SPEED_KM_S;
    let s_wave_secs = distance_km / S_WAVE_SPEED_KM_S;

    WaveArrival {
        p_wave_secs,
        s_wave_secs,
        gap_secs: s_wave_secs - p_wave_secs,
    }
}
