//! Labelled training table

use super::sample::{Feature, Sample, N_FEATURES};
use crate::error::{AgriError, Result};
use crate::utils::data_loader::{DataLoader, DataSaver};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Name of the label column in training tables
pub const LABEL_COLUMN: &str = "label";

/// Ordered labelled rows sharing the seven-feature schema.
///
/// Labels are stored as indices into a sorted, de-duplicated vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    features: Array2<f64>,
    labels: Array1<usize>,
    vocabulary: Vec<String>,
}

impl TrainingSet {
    /// Build from feature rows and raw label strings
    pub fn new(features: Array2<f64>, labels: Vec<String>) -> Result<Self> {
        if features.ncols() != N_FEATURES {
            return Err(AgriError::ShapeError {
                expected: format!("{} feature columns", N_FEATURES),
                actual: format!("{} feature columns", features.ncols()),
            });
        }
        if features.nrows() != labels.len() {
            return Err(AgriError::ShapeError {
                expected: format!("{} labels", features.nrows()),
                actual: format!("{} labels", labels.len()),
            });
        }
        if labels.is_empty() {
            return Err(AgriError::DataError("training set has no rows".to_string()));
        }
        if let Some(((row, col), value)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(AgriError::DataError(format!(
                "non-finite value {} in column '{}' at row {}",
                value,
                Feature::ALL[col].column(),
                row
            )));
        }

        let vocabulary: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let indices = labels
            .iter()
            .map(|l| vocabulary.binary_search(l).unwrap_or_default())
            .collect();

        Ok(Self {
            features,
            labels: Array1::from_vec(indices),
            vocabulary,
        })
    }

    /// Build from labelled samples. Samples without a label are rejected.
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        let mut labels = Vec::with_capacity(samples.len());
        let mut features = Array2::zeros((samples.len(), N_FEATURES));
        for (i, sample) in samples.iter().enumerate() {
            let label = sample.label.clone().ok_or_else(|| {
                AgriError::DataError(format!("sample {} has no label", i))
            })?;
            labels.push(label);
            for (j, value) in sample.to_features().iter().enumerate() {
                features[[i, j]] = *value;
            }
        }
        Self::new(features, labels)
    }

    /// Extract the seven feature columns and the label column from a table
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let n_rows = df.height();
        let col_data: Vec<Vec<f64>> = Feature::ALL
            .iter()
            .map(|feature| {
                let series = df.column(feature.column()).map_err(|_| {
                    AgriError::DataError(format!("missing column '{}'", feature.column()))
                })?;
                let series_f64 = series.cast(&DataType::Float64)?;
                series_f64
                    .f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, v)| {
                        v.ok_or_else(|| {
                            AgriError::DataError(format!(
                                "missing value in column '{}' at row {}",
                                feature.column(),
                                row
                            ))
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let label_series = df.column(LABEL_COLUMN).map_err(|_| {
            AgriError::DataError(format!("missing column '{}'", LABEL_COLUMN))
        })?;
        let label_series = label_series.cast(&DataType::String)?;
        let labels = label_series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| AgriError::DataError(format!("missing label at row {}", row)))
            })
            .collect::<Result<Vec<String>>>()?;

        let features = Array2::from_shape_fn((n_rows, N_FEATURES), |(r, c)| col_data[c][r]);
        Self::new(features, labels)
    }

    /// Load a CSV with columns `N,P,K,temperature,humidity,ph,rainfall,label`
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let df = DataLoader::new().load_csv(path)?;
        let set = Self::from_dataframe(&df)?;
        debug!(
            path = %path.display(),
            rows = set.len(),
            classes = set.n_classes(),
            "Loaded training table"
        );
        Ok(set)
    }

    /// Convert back into a table with the canonical column names
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Series> = Feature::ALL
            .iter()
            .enumerate()
            .map(|(j, feature)| {
                let values: Vec<f64> = self.features.column(j).to_vec();
                Series::new(feature.column().into(), values)
            })
            .collect();
        let labels: Vec<&str> = self
            .labels
            .iter()
            .map(|&i| self.vocabulary[i].as_str())
            .collect();
        columns.push(Series::new(LABEL_COLUMN.into(), labels));
        Ok(DataFrame::new(columns)?)
    }

    /// Write the table as CSV
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut df = self.to_dataframe()?;
        DataSaver::save_csv(&mut df, path)
    }

    /// Rows at the given indices, keeping the full vocabulary
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            vocabulary: self.vocabulary.clone(),
        }
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Label indices into [`TrainingSet::vocabulary`]
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Sorted crop names
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn n_classes(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row count per crop, in vocabulary order
    pub fn label_counts(&self) -> Vec<(String, usize)> {
        let mut counts = vec![0usize; self.vocabulary.len()];
        for &label in self.labels.iter() {
            counts[label] += 1;
        }
        self.vocabulary.iter().cloned().zip(counts).collect()
    }

    /// Row `i` as a labelled sample
    pub fn sample(&self, i: usize) -> Option<Sample> {
        if i >= self.len() {
            return None;
        }
        let row = self.features.row(i).to_vec();
        Sample::from_features(&row)
            .ok()
            .map(|s| s.with_label(self.vocabulary[self.labels[i]].clone()))
    }
}
