//! Classification metrics

use crate::error::{AgriError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of correct predictions, always within `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Accuracy(f64);

impl Accuracy {
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AgriError::ValidationError(format!(
                "accuracy must be in [0, 1], got {}",
                value
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Compare predicted class indices against the truth
pub fn accuracy(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<Accuracy> {
    if y_true.len() != y_pred.len() {
        return Err(AgriError::ShapeError {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(AgriError::ValidationError(
            "accuracy of an empty partition is undefined".to_string(),
        ));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Accuracy::new(correct as f64 / y_true.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        let acc = accuracy(&array![0, 1, 2, 2], &array![0, 1, 1, 2]).unwrap();
        assert!((acc.value() - 0.75).abs() < 1e-12);
        assert_eq!(acc.to_string(), "75.0%");
    }

    #[test]
    fn test_accuracy_errors() {
        assert!(accuracy(&array![0, 1], &array![0]).is_err());
        assert!(accuracy(&Array1::from_vec(vec![]), &Array1::from_vec(vec![])).is_err());
    }

    #[test]
    fn test_bounds() {
        assert!(Accuracy::new(1.0).is_ok());
        assert!(Accuracy::new(0.0).is_ok());
        assert!(Accuracy::new(1.01).is_err());
        assert!(Accuracy::new(f64::NAN).is_err());
    }
}
