//! Crop prediction
//!
//! [`CropPredictor`] is the entry point: it acquires training data, fits or
//! loads a [`CropModel`] once, and answers single-sample queries with it.

mod model;
mod predictor;

pub use model::{CropModel, Prediction};
pub use predictor::CropPredictor;
