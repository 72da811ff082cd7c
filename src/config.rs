//! Predictor configuration

use crate::error::{AgriError, Result};
use crate::training::{Criterion, MaxFeatures, RandomForest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where training rows come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// CSV file with the seven feature columns and a `label` column
    Csv { path: PathBuf },
    /// Seeded synthetic fixture; only used when configured explicitly
    Synthetic { seed: u64, samples_per_crop: usize },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Csv {
            path: PathBuf::from("data/Crop_recommendation.csv"),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Csv { path } => write!(f, "csv:{}", path.display()),
            DataSource::Synthetic { seed, samples_per_crop } => {
                write!(f, "synthetic(seed={}, per_crop={})", seed, samples_per_crop)
            }
        }
    }
}

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub criterion: Criterion,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            criterion: Criterion::Gini,
        }
    }
}

impl ForestConfig {
    /// Unfitted forest with these settings
    pub fn build(&self, seed: u64) -> RandomForest {
        let mut forest = RandomForest::new(self.n_estimators)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_max_features(self.max_features)
            .with_criterion(self.criterion)
            .with_random_state(seed);
        if let Some(depth) = self.max_depth {
            forest = forest.with_max_depth(depth);
        }
        forest
    }
}

/// Configuration for [`crate::inference::CropPredictor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Training data source
    pub data_source: DataSource,
    /// Persisted model file; no persistence when `None`
    pub model_path: Option<PathBuf>,
    /// Held-out fraction for evaluation
    pub test_size: f64,
    /// Seed for the split and the forest
    pub random_seed: u64,
    /// Forest hyperparameters
    pub forest: ForestConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::default(),
            model_path: Some(PathBuf::from("models/crop_model.bin")),
            test_size: 0.2,
            random_seed: 42,
            forest: ForestConfig::default(),
        }
    }
}

impl PredictorConfig {
    /// Train from a CSV file
    pub fn from_csv(path: impl Into<PathBuf>) -> Self {
        Self::default().with_data_source(DataSource::Csv { path: path.into() })
    }

    /// Train from the seeded synthetic fixture
    pub fn synthetic(seed: u64) -> Self {
        Self::default().with_data_source(DataSource::Synthetic {
            seed,
            samples_per_crop: crate::dataset::synthetic::DEFAULT_SAMPLES_PER_CROP,
        })
    }

    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_source = source;
        self
    }

    /// Set the persisted model file
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Keep the model in memory only
    pub fn without_persistence(mut self) -> Self {
        self.model_path = None;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.forest.n_estimators = n;
        self
    }

    pub fn with_forest(mut self, forest: ForestConfig) -> Self {
        self.forest = forest;
        self
    }

    /// Reject settings that cannot produce a model
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(AgriError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.forest.n_estimators == 0 {
            return Err(AgriError::ConfigError(
                "forest.n_estimators must be at least 1".to_string(),
            ));
        }
        if let DataSource::Synthetic { samples_per_crop: 0, .. } = self.data_source {
            return Err(AgriError::ConfigError(
                "samples_per_crop must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AgriError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.forest.n_estimators, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(PredictorConfig::default().with_test_size(1.0).validate().is_err());
        assert!(PredictorConfig::default().with_n_estimators(0).validate().is_err());
        let source = DataSource::Synthetic { seed: 1, samples_per_crop: 0 };
        assert!(PredictorConfig::default().with_data_source(source).validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_and_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agriverse.json");

        let config = PredictorConfig::synthetic(7)
            .with_model_path(dir.path().join("model.bin"))
            .with_n_estimators(25);
        config.save(&path).unwrap();
        assert_eq!(PredictorConfig::load(&path).unwrap(), config);

        std::fs::write(&path, r#"{ "test_size": 0.3, "forest": { "n_estimators": 10 } }"#).unwrap();
        let partial = PredictorConfig::load(&path).unwrap();
        assert_eq!(partial.test_size, 0.3);
        assert_eq!(partial.forest.n_estimators, 10);
        assert_eq!(partial.forest.min_samples_split, 2);
        assert_eq!(partial.random_seed, 42);
    }

    #[test]
    fn test_data_source_display() {
        let csv = DataSource::Csv { path: PathBuf::from("data/crops.csv") };
        assert_eq!(csv.to_string(), "csv:data/crops.csv");
        let synthetic = DataSource::Synthetic { seed: 42, samples_per_crop: 40 };
        assert_eq!(synthetic.to_string(), "synthetic(seed=42, per_crop=40)");
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "test_size": 2.0 }"#).unwrap();
        assert!(matches!(PredictorConfig::load(&path), Err(AgriError::ConfigError(_))));
    }
}
