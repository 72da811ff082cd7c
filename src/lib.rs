//! AgriVerse - Crop recommendation engine
//!
//! This crate recommends a crop from seven soil and climate readings using a
//! random forest trained on a labelled table:
//! - Training data loading (CSV via polars, or a seeded synthetic fixture)
//! - CART decision trees and a bagged random forest
//! - Train-or-load lifecycle with a single persisted model file
//! - Static crop profiles and soil advice for presenting a result
//!
//! # Modules
//!
//! ## Core
//! - [`inference`] - [`CropPredictor`](inference::CropPredictor) and the fitted model
//! - [`training`] - Decision tree, random forest, split and accuracy
//! - [`dataset`] - Samples, training tables, synthetic fixture
//!
//! ## Supporting
//! - [`config`] - Predictor and forest configuration
//! - [`export`] - Model file persistence
//! - [`catalog`] - Crop profiles, soil status, advisories
//! - [`utils`] - CSV loading and saving
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use agriverse::prelude::*;
//!
//! let predictor = CropPredictor::new(PredictorConfig::from_csv("data/Crop_recommendation.csv"))?;
//! let sample = Sample::new(90.0, 42.0, 43.0, 20.9, 82.0, 6.5, 202.9);
//! let prediction = predictor.predict(&sample)?;
//! println!("{} ({:.0}%)", prediction.label, prediction.confidence * 100.0);
//! # Ok::<(), agriverse::AgriError>(())
//! ```

// Core error handling
pub mod error;
pub mod config;

// Core ML modules
pub mod dataset;
pub mod training;
pub mod inference;

// Utilities
pub mod export;
pub mod catalog;
pub mod utils;

// Services
pub mod cli;

pub use error::{AgriError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{AgriError, Result};

    // Configuration
    pub use crate::config::{DataSource, ForestConfig, PredictorConfig};

    // Data
    pub use crate::dataset::{Feature, Sample, SyntheticGenerator, TrainingSet};

    // Training
    pub use crate::training::{Accuracy, Criterion, MaxFeatures, RandomForest};

    // Inference
    pub use crate::inference::{CropModel, CropPredictor, Prediction};

    // Export
    pub use crate::export::ModelStore;

    // Catalog
    pub use crate::catalog::{CropProfile, SoilStatus};
}
