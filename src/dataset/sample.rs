//! Soil and climate readings submitted for prediction

use crate::error::{AgriError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of input features a sample carries.
pub const N_FEATURES: usize = 7;

/// One input feature, in the fixed order the model is trained and queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    /// All features in model column order
    pub const ALL: [Feature; N_FEATURES] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    /// Column name in the training CSV
    pub fn column(&self) -> &'static str {
        match self {
            Feature::Nitrogen => "N",
            Feature::Phosphorus => "P",
            Feature::Potassium => "K",
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::Ph => "ph",
            Feature::Rainfall => "rainfall",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen (N)",
            Feature::Phosphorus => "Phosphorus (P)",
            Feature::Potassium => "Potassium (K)",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::Ph => "pH Level",
            Feature::Rainfall => "Rainfall",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium => "ppm",
            Feature::Temperature => "°C",
            Feature::Humidity => "%",
            Feature::Ph => "",
            Feature::Rainfall => "mm",
        }
    }

    /// Physically meaningful range, inclusive. `None` on the upper side means unbounded.
    pub fn physical_range(&self) -> (f64, Option<f64>) {
        match self {
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium => (0.0, None),
            Feature::Temperature => (-10.0, Some(60.0)),
            Feature::Humidity => (0.0, Some(100.0)),
            Feature::Ph => (0.0, Some(14.0)),
            Feature::Rainfall => (0.0, None),
        }
    }

    /// Typical display range used for gauges (min, max)
    pub fn gauge_range(&self) -> (f64, f64) {
        match self {
            Feature::Nitrogen => (0.0, 140.0),
            Feature::Phosphorus => (0.0, 145.0),
            Feature::Potassium => (0.0, 205.0),
            Feature::Temperature => (0.0, 50.0),
            Feature::Humidity => (0.0, 100.0),
            Feature::Ph => (0.0, 14.0),
            Feature::Rainfall => (0.0, 500.0),
        }
    }

    /// Column names of all features in order
    pub fn columns() -> Vec<String> {
        Self::ALL.iter().map(|f| f.column().to_string()).collect()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A set of seven soil/climate measurements, optionally labelled with a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Nitrogen content (ppm)
    pub nitrogen: f64,
    /// Phosphorus content (ppm)
    pub phosphorus: f64,
    /// Potassium content (ppm)
    pub potassium: f64,
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Soil pH
    pub ph: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
    /// Crop name, present on training rows
    #[serde(default)]
    pub label: Option<String>,
}

impl Sample {
    pub fn new(
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        temperature: f64,
        humidity: f64,
        ph: f64,
        rainfall: f64,
    ) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
            label: None,
        }
    }

    /// Build from a feature row in model column order
    pub fn from_features(values: &[f64]) -> Result<Self> {
        if values.len() != N_FEATURES {
            return Err(AgriError::ShapeError {
                expected: format!("{} features", N_FEATURES),
                actual: format!("{} features", values.len()),
            });
        }
        Ok(Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5], values[6],
        ))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Value of a single feature
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Nitrogen => self.nitrogen,
            Feature::Phosphorus => self.phosphorus,
            Feature::Potassium => self.potassium,
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::Ph => self.ph,
            Feature::Rainfall => self.rainfall,
        }
    }

    /// Features in model column order
    pub fn to_features(&self) -> [f64; N_FEATURES] {
        Feature::ALL.map(|f| self.get(f))
    }

    /// Reject non-finite values. This is the only check the prediction path makes.
    pub fn ensure_finite(&self) -> Result<()> {
        for feature in Feature::ALL {
            let value = self.get(feature);
            if !value.is_finite() {
                return Err(AgriError::ValidationError(format!(
                    "{} is not a finite number: {}",
                    feature, value
                )));
            }
        }
        Ok(())
    }

    /// Check every reading against its physical range
    pub fn validate(&self) -> Result<()> {
        self.ensure_finite()?;
        for feature in Feature::ALL {
            let value = self.get(feature);
            let (min, max) = feature.physical_range();
            let too_high = max.map_or(false, |m| value > m);
            if value < min || too_high {
                let upper = max.map_or_else(|| "inf".to_string(), |m| m.to_string());
                return Err(AgriError::ValidationError(format!(
                    "{} = {} is outside [{}, {}]",
                    feature, value, min, upper
                )));
            }
        }
        Ok(())
    }
}
