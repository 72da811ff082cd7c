//! The fitted crop classifier and its held-out partition

use crate::config::PredictorConfig;
use crate::dataset::{Feature, Sample, TrainingSet, N_FEATURES};
use crate::error::{AgriError, Result};
use crate::training::{accuracy, train_test_split, Accuracy, RandomForest};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// A predicted crop with the share of trees that voted for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// Trained model. Immutable once fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropModel {
    forest: RandomForest,
    vocabulary: Vec<String>,
    feature_names: Vec<String>,
    holdout: TrainingSet,
    accuracy: Accuracy,
    n_train: usize,
    trained_at: DateTime<Utc>,
    /// Data source the model was fit on
    source: String,
}

impl CropModel {
    /// Split `set`, fit a forest on the training partition and score it on
    /// the test partition.
    pub fn fit(set: &TrainingSet, config: &PredictorConfig) -> Result<Self> {
        let start = Instant::now();
        let split = train_test_split(set.len(), config.test_size, config.random_seed)?;
        let train = set.select(&split.train);
        let holdout = set.select(&split.test);

        let mut forest = config.forest.build(config.random_seed);
        forest
            .fit_with_classes(train.features(), train.labels(), set.n_classes())
            .map_err(|e| AgriError::TrainingError(e.to_string()))?;

        let y_pred = forest.predict(holdout.features())?;
        let accuracy = accuracy(holdout.labels(), &y_pred)?;

        info!(
            source = %config.data_source,
            train_rows = train.len(),
            test_rows = holdout.len(),
            classes = set.n_classes(),
            trees = forest.n_trees(),
            accuracy = accuracy.value(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fitted crop model"
        );

        Ok(Self {
            forest,
            vocabulary: set.vocabulary().to_vec(),
            feature_names: Feature::columns(),
            holdout,
            accuracy,
            n_train: train.len(),
            trained_at: Utc::now(),
            source: config.data_source.to_string(),
        })
    }

    /// Vote share per vocabulary entry for one sample
    fn class_probabilities(&self, sample: &Sample) -> Result<Vec<f64>> {
        sample.ensure_finite()?;
        let row = Array2::from_shape_vec((1, N_FEATURES), sample.to_features().to_vec())?;
        let proba = self.forest.predict_proba(&row)?;
        Ok(proba.row(0).to_vec())
    }

    /// Predict the crop for one sample
    pub fn predict(&self, sample: &Sample) -> Result<Prediction> {
        let proba = self.class_probabilities(sample)?;

        // Lowest class index wins a tie, matching the forest's majority vote.
        let mut best = 0;
        for (i, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = i;
            }
        }

        let label = self.vocabulary.get(best).cloned().ok_or_else(|| {
            AgriError::PredictionFailed(format!("class index {} outside vocabulary", best))
        })?;

        Ok(Prediction {
            label,
            confidence: proba.get(best).copied().unwrap_or_default(),
        })
    }

    /// Crops ordered by vote share, keeping only those that received votes
    pub fn rank(&self, sample: &Sample, top_k: usize) -> Result<Vec<Prediction>> {
        let proba = self.class_probabilities(sample)?;
        let mut ranked: Vec<(usize, f64)> = proba
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(ranked
            .into_iter()
            .take(top_k)
            .filter_map(|(i, p)| {
                self.vocabulary.get(i).map(|label| Prediction {
                    label: label.clone(),
                    confidence: p,
                })
            })
            .collect())
    }

    /// Recompute accuracy on the held-out partition
    pub fn evaluate(&self) -> Result<Accuracy> {
        let y_pred = self.forest.predict(self.holdout.features())?;
        accuracy(self.holdout.labels(), &y_pred)
    }

    /// Accuracy measured when the model was fit
    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Normalized importance per feature, in column order
    pub fn feature_importances(&self) -> Vec<(Feature, f64)> {
        match self.forest.feature_importances() {
            Some(imp) => Feature::ALL.iter().copied().zip(imp.iter().copied()).collect(),
            None => Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    pub fn n_train(&self) -> usize {
        self.n_train
    }

    pub fn n_test(&self) -> usize {
        self.holdout.len()
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Description of the data source the model was fit on
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SyntheticGenerator;

    fn small_model() -> (TrainingSet, CropModel) {
        let set = SyntheticGenerator::new(42).with_samples_per_crop(10).generate().unwrap();
        let config = PredictorConfig::synthetic(42).with_n_estimators(15);
        let model = CropModel::fit(&set, &config).unwrap();
        (set, model)
    }

    #[test]
    fn test_fit_partitions() {
        let (set, model) = small_model();
        assert_eq!(model.n_train() + model.n_test(), set.len());
        assert_eq!(model.n_test(), 48);
        assert_eq!(model.n_trees(), 15);
        assert_eq!(model.vocabulary(), set.vocabulary());
        assert_eq!(model.source(), "synthetic(seed=42, per_crop=40)");
    }

    #[test]
    fn test_prediction_in_vocabulary() {
        let (_, model) = small_model();
        let prediction = model.predict(&Sample::new(90.0, 42.0, 43.0, 20.9, 82.0, 6.5, 202.9)).unwrap();
        assert!(model.vocabulary().contains(&prediction.label));
        assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
    }

    #[test]
    fn test_evaluate_matches_fit_accuracy() {
        let (_, model) = small_model();
        assert_eq!(model.evaluate().unwrap(), model.accuracy());
    }

    #[test]
    fn test_rank_is_sorted_and_led_by_prediction() {
        let (_, model) = small_model();
        let sample = Sample::new(20.0, 60.0, 80.0, 18.0, 16.0, 7.0, 80.0);
        let ranked = model.rank(&sample, 5).unwrap();
        assert!(!ranked.is_empty() && ranked.len() <= 5);
        assert!(ranked.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(ranked[0].confidence, model.predict(&sample).unwrap().confidence);
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let (_, model) = small_model();
        let sample = Sample::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(model.predict(&sample).is_err());
    }

    #[test]
    fn test_feature_importances_cover_all_features() {
        let (_, model) = small_model();
        let importances = model.feature_importances();
        assert_eq!(importances.len(), N_FEATURES);
        let total: f64 = importances.iter().map(|(_, v)| v).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }
}
