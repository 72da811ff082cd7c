//! Descriptive crop information shown next to a prediction
//!
//! Everything here is static: a growing profile per crop label, a soil
//! status derived from pH, and a fixed list of cultivation advisories.

use crate::dataset::Feature;
use serde::Serialize;
use std::fmt;

/// Growing conditions for one crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropProfile {
    pub season: &'static str,
    pub water: &'static str,
    pub temperature: &'static str,
    pub soil: &'static str,
    pub emoji: &'static str,
}

/// Profile for labels without a specific entry
pub const DEFAULT_PROFILE: CropProfile = CropProfile {
    season: "Variable",
    water: "Moderate",
    temperature: "Variable",
    soil: "Well-drained",
    emoji: "🌱",
};

const PROFILES: [(&str, CropProfile); 9] = [
    ("rice", CropProfile { season: "Kharif", water: "High", temperature: "20-30°C", soil: "Clay loam", emoji: "🌾" }),
    ("wheat", CropProfile { season: "Rabi", water: "Moderate", temperature: "15-25°C", soil: "Loam", emoji: "🌾" }),
    ("maize", CropProfile { season: "Kharif/Rabi", water: "Moderate", temperature: "25-30°C", soil: "Well-drained", emoji: "🌽" }),
    ("cotton", CropProfile { season: "Kharif", water: "Moderate", temperature: "25-35°C", soil: "Black cotton", emoji: "🌿" }),
    ("sugarcane", CropProfile { season: "Year-round", water: "High", temperature: "26-32°C", soil: "Heavy loam", emoji: "🎋" }),
    ("banana", CropProfile { season: "Year-round", water: "High", temperature: "25-30°C", soil: "Rich loam", emoji: "🍌" }),
    ("apple", CropProfile { season: "Rabi", water: "Moderate", temperature: "15-25°C", soil: "Well-drained", emoji: "🍎" }),
    ("mango", CropProfile { season: "Summer", water: "Moderate", temperature: "24-30°C", soil: "Well-drained", emoji: "🥭" }),
    ("grapes", CropProfile { season: "Rabi", water: "Moderate", temperature: "15-25°C", soil: "Well-drained", emoji: "🍇" }),
];

/// Crop labels with a specific profile
pub fn known_crops() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|(name, _)| *name)
}

/// Case-insensitive lookup, falling back to [`DEFAULT_PROFILE`]
pub fn profile(crop: &str) -> CropProfile {
    let crop = crop.trim();
    PROFILES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(crop))
        .map(|(_, profile)| *profile)
        .unwrap_or(DEFAULT_PROFILE)
}

/// Soil reaction classified from pH
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoilStatus {
    Acidic,
    Neutral,
    Alkaline,
}

impl SoilStatus {
    /// Below 6.5 is acidic, above 7.5 alkaline
    pub fn from_ph(ph: f64) -> Self {
        if ph < 6.5 {
            SoilStatus::Acidic
        } else if ph > 7.5 {
            SoilStatus::Alkaline
        } else {
            SoilStatus::Neutral
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            SoilStatus::Acidic => "Consider adding lime to increase pH",
            SoilStatus::Neutral => "Optimal pH range for most crops",
            SoilStatus::Alkaline => "Consider adding sulfur to decrease pH",
        }
    }
}

impl fmt::Display for SoilStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SoilStatus::Acidic => "Acidic Soil",
            SoilStatus::Neutral => "Neutral Soil",
            SoilStatus::Alkaline => "Alkaline Soil",
        };
        write!(f, "{}", s)
    }
}

/// Cultivation advisories for a recommended crop
pub fn advisories(crop: &str) -> Vec<String> {
    vec![
        format!("🔬 Consult agricultural experts for {} cultivation techniques", crop),
        format!("💰 Research market prices and demand for {} in your region", crop),
        "🔄 Plan crop rotation to maintain soil health and fertility".to_string(),
        "🌦️ Monitor weather patterns for optimal planting time".to_string(),
        "🧪 Conduct detailed soil testing for precise nutrient management".to_string(),
        "🌱 Source high-quality seeds from certified suppliers".to_string(),
        format!("💧 Install appropriate irrigation systems for {}", crop),
        format!("📅 Create a seasonal calendar for {} cultivation", crop),
    ]
}

/// Fill level of a reading on a `[min, max]` gauge, clamped to `[0, 100]`
pub fn gauge_percentage(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || max <= min {
        return 0.0;
    }
    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Gauge level of a reading on its feature's display range
pub fn feature_gauge(feature: Feature, value: f64) -> f64 {
    let (min, max) = feature.gauge_range();
    gauge_percentage(value, min, max)
}
