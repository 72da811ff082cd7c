//! Model training module
//!
//! Provides the classifier behind the crop predictor:
//! - CART decision trees over class indices
//! - Random Forest (bagged trees, per-split feature sampling)
//! - Seeded train/test split and accuracy

pub mod decision_tree;
pub mod metrics;
pub mod random_forest;
pub mod split;

pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use metrics::{accuracy, Accuracy};
pub use random_forest::{MaxFeatures, RandomForest};
pub use split::{train_test_split, TrainTestSplit};
