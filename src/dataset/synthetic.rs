//! Seeded synthetic training data.
//!
//! This is a fixture for demos and tests. Features are drawn uniformly and
//! independently of the label, so a model fit on it carries no agronomic
//! signal. It is only ever used when explicitly requested.

use super::sample::{Feature, N_FEATURES};
use super::training_set::TrainingSet;
use crate::error::{AgriError, Result};
use ndarray::Array2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Crop vocabulary of the synthetic fixture
pub const SYNTHETIC_CROPS: [&str; 24] = [
    "rice", "wheat", "maize", "cotton", "sugarcane", "jute", "coffee", "coconut",
    "apple", "banana", "grapes", "watermelon", "muskmelon", "orange", "papaya",
    "pomegranate", "mango", "mothbeans", "pigeonpeas", "kidneybeans", "chickpea",
    "lentil", "blackgram", "mungbean",
];

/// Default rows generated per crop
pub const DEFAULT_SAMPLES_PER_CROP: usize = 40;

/// Default generator seed
pub const DEFAULT_SEED: u64 = 42;

/// Half-open sampling range of a feature in the fixture
fn sampling_range(feature: Feature) -> (f64, f64) {
    match feature {
        Feature::Nitrogen => (0.0, 140.0),
        Feature::Phosphorus => (5.0, 145.0),
        Feature::Potassium => (5.0, 205.0),
        Feature::Temperature => (8.0, 43.0),
        Feature::Humidity => (14.0, 100.0),
        Feature::Ph => (3.5, 10.0),
        Feature::Rainfall => (20.0, 300.0),
    }
}

/// Generator for the synthetic crop table
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    seed: u64,
    samples_per_crop: usize,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            samples_per_crop: DEFAULT_SAMPLES_PER_CROP,
        }
    }

    /// Set rows per crop
    pub fn with_samples_per_crop(mut self, n: usize) -> Self {
        self.samples_per_crop = n;
        self
    }

    /// Generate the table. Same seed, same table.
    pub fn generate(&self) -> Result<TrainingSet> {
        if self.samples_per_crop == 0 {
            return Err(AgriError::ValidationError(
                "samples_per_crop must be at least 1".to_string(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n_rows = SYNTHETIC_CROPS.len() * self.samples_per_crop;
        let mut features = Array2::zeros((n_rows, N_FEATURES));
        let mut labels = Vec::with_capacity(n_rows);

        let mut row = 0;
        for crop in SYNTHETIC_CROPS {
            for _ in 0..self.samples_per_crop {
                for (j, feature) in Feature::ALL.iter().enumerate() {
                    let (low, high) = sampling_range(*feature);
                    features[[row, j]] = rng.gen_range(low..high);
                }
                labels.push(crop.to_string());
                row += 1;
            }
        }

        TrainingSet::new(features, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_vocabulary() {
        let set = SyntheticGenerator::new(7).with_samples_per_crop(5).generate().unwrap();
        assert_eq!(set.len(), 24 * 5);
        assert_eq!(set.n_classes(), 24);
        assert!(set.label_counts().iter().all(|(_, n)| *n == 5));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = SyntheticGenerator::new(42).generate().unwrap();
        let b = SyntheticGenerator::new(42).generate().unwrap();
        let c = SyntheticGenerator::new(43).generate().unwrap();
        assert_eq!(a, b);
        assert_ne!(a.features(), c.features());
    }

    #[test]
    fn test_values_within_sampling_ranges() {
        let set = SyntheticGenerator::default().generate().unwrap();
        for (j, feature) in Feature::ALL.iter().enumerate() {
            let (low, high) = sampling_range(*feature);
            assert!(set.features().column(j).iter().all(|&v| v >= low && v < high));
        }
    }

    #[test]
    fn test_zero_rows_rejected() {
        assert!(SyntheticGenerator::new(1).with_samples_per_crop(0).generate().is_err());
    }
}
