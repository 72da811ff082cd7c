//! Error types for the AgriVerse crop predictor

use thiserror::Error;

/// Result type alias for AgriVerse operations
pub type Result<T> = std::result::Result<T, AgriError>;

/// Main error type for the crop predictor
#[derive(Error, Debug)]
pub enum AgriError {
    #[error("Training data not found: {0}")]
    DataNotFound(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AgriError {
    /// Collapse any failure on the prediction path into `PredictionFailed`.
    pub fn into_prediction_failure(self) -> Self {
        match self {
            AgriError::PredictionFailed(_) => self,
            other => AgriError::PredictionFailed(other.to_string()),
        }
    }
}

impl From<polars::error::PolarsError> for AgriError {
    fn from(err: polars::error::PolarsError) -> Self {
        AgriError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for AgriError {
    fn from(err: serde_json::Error) -> Self {
        AgriError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for AgriError {
    fn from(err: bincode::Error) -> Self {
        AgriError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for AgriError {
    fn from(err: ndarray::ShapeError) -> Self {
        AgriError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgriError::DataNotFound("data/crops.csv".to_string());
        assert_eq!(err.to_string(), "Training data not found: data/crops.csv");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AgriError = io_err.into();
        assert!(matches!(err, AgriError::IoError(_)));
    }

    #[test]
    fn test_prediction_failure_wraps_cause() {
        let err = AgriError::ModelNotFitted.into_prediction_failure();
        assert!(matches!(err, AgriError::PredictionFailed(ref msg) if msg == "Model not fitted"));

        let err = AgriError::PredictionFailed("bad input".into()).into_prediction_failure();
        assert_eq!(err.to_string(), "Prediction failed: bad input");
    }
}
