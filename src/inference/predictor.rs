//! Train-or-load lifecycle around a single crop model

use super::model::{CropModel, Prediction};
use crate::config::{DataSource, PredictorConfig};
use crate::dataset::{Sample, SyntheticGenerator, TrainingSet};
use crate::error::{AgriError, Result};
use crate::export::ModelStore;
use crate::training::Accuracy;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the model lifecycle for one configuration.
///
/// The model is built at most once per predictor. The first caller of
/// [`train_or_load_model`](Self::train_or_load_model) holds the lock while the
/// model file is read or the forest is trained and written; everyone else gets
/// a shared handle afterwards. A failed build leaves the predictor untrained
/// and the next call starts over.
pub struct CropPredictor {
    config: PredictorConfig,
    store: Option<ModelStore>,
    model: Mutex<Option<Arc<CropModel>>>,
}

impl std::fmt::Debug for CropPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropPredictor")
            .field("config", &self.config)
            .field("is_trained", &self.is_trained())
            .finish()
    }
}

impl CropPredictor {
    pub fn new(config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        let store = config.model_path.as_ref().map(ModelStore::new);
        Ok(Self {
            config,
            store,
            model: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Persisted model file, if any
    pub fn model_path(&self) -> Option<&Path> {
        self.store.as_ref().map(|s| s.path())
    }

    pub fn is_trained(&self) -> bool {
        self.model.lock().is_some()
    }

    /// Read the configured data source
    pub fn load_training_set(&self) -> Result<TrainingSet> {
        let set = match &self.config.data_source {
            DataSource::Csv { path } => TrainingSet::from_csv(path)?,
            DataSource::Synthetic {
                seed,
                samples_per_crop,
            } => {
                info!(seed, samples_per_crop, "Generating synthetic training data");
                SyntheticGenerator::new(*seed)
                    .with_samples_per_crop(*samples_per_crop)
                    .generate()?
            }
        };
        info!(rows = set.len(), classes = set.n_classes(), "Training data loaded");
        Ok(set)
    }

    /// Return the model, loading it from disk or training it on first use
    pub fn train_or_load_model(&self) -> Result<Arc<CropModel>> {
        let mut slot = self.model.lock();
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let mut load_error = None;
        if let Some(store) = self.store.as_ref().filter(|s| s.exists()) {
            match store.load() {
                Ok(model) => {
                    info!(
                        path = %store.path().display(),
                        source = model.source(),
                        classes = model.vocabulary().len(),
                        trained_at = %model.trained_at(),
                        "Loaded model file"
                    );
                    let configured = self.config.data_source.to_string();
                    if model.source() != configured {
                        warn!(
                            path = %store.path().display(),
                            trained_on = model.source(),
                            configured = %configured,
                            "Model file was trained on a different data source; use retrain to refit"
                        );
                    }
                    let model = Arc::new(model);
                    *slot = Some(Arc::clone(&model));
                    return Ok(model);
                }
                Err(e) => {
                    warn!(
                        path = %store.path().display(),
                        error = %e,
                        "Model file unreadable, retraining"
                    );
                    load_error = Some(e);
                }
            }
        }

        let model = match self.fit_and_persist() {
            Ok(model) => Arc::new(model),
            Err(e) => {
                return Err(match load_error {
                    Some(load_error) => AgriError::ModelUnavailable(format!(
                        "{}; retraining failed: {}",
                        load_error, e
                    )),
                    None => e,
                })
            }
        };
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Train a new model, replacing the cached and persisted one.
    /// On failure the previous model stays in place.
    pub fn retrain(&self) -> Result<Arc<CropModel>> {
        let mut slot = self.model.lock();
        let model = Arc::new(self.fit_and_persist()?);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Caller must hold the model lock.
    fn fit_and_persist(&self) -> Result<CropModel> {
        let set = self.load_training_set()?;
        let model = CropModel::fit(&set, &self.config)?;

        if let Some(store) = &self.store {
            match store.save(&model) {
                Ok(()) => info!(path = %store.path().display(), "Saved model file"),
                Err(e) => warn!(
                    path = %store.path().display(),
                    error = %e,
                    "Could not save model file, keeping it in memory only"
                ),
            }
        }
        Ok(model)
    }

    /// Predict the crop for one sample.
    ///
    /// Every failure, including an unavailable model, is reported as
    /// [`AgriError::PredictionFailed`].
    pub fn predict(&self, sample: &Sample) -> Result<Prediction> {
        self.train_or_load_model()
            .and_then(|model| model.predict(sample))
            .map_err(|e| {
                warn!(error = %e, "Prediction failed");
                e.into_prediction_failure()
            })
    }

    /// Up to `top_k` crops ordered by vote share
    pub fn rank(&self, sample: &Sample, top_k: usize) -> Result<Vec<Prediction>> {
        self.train_or_load_model()
            .and_then(|model| model.rank(sample, top_k))
            .map_err(AgriError::into_prediction_failure)
    }

    /// Accuracy of the current model on its held-out partition
    pub fn evaluate(&self) -> Result<Accuracy> {
        self.train_or_load_model()?.evaluate()
    }
}
