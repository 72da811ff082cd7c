//! Training data and prediction inputs
//!
//! - [`Sample`]: seven soil/climate readings in fixed [`Feature`] order
//! - [`TrainingSet`]: labelled rows with a closed crop vocabulary
//! - [`SyntheticGenerator`]: seeded fixture data, opt-in only

pub mod sample;
pub mod synthetic;
pub mod training_set;

pub use sample::{Feature, Sample, N_FEATURES};
pub use synthetic::{SyntheticGenerator, SYNTHETIC_CROPS};
pub use training_set::{TrainingSet, LABEL_COLUMN};
