//! Model training module
//!
//! Provides the classifier behind the risk model:
//! - Variance-reduction regression trees
//! - Log-loss gradient boosting with seeded subsampling
//! - Binary classification metrics
//! - The model unit that pairs a classifier with its fitted transformer

mod metrics;
mod trainer;
mod unit;
pub mod decision_tree;
pub mod gradient_boosting;

pub use decision_tree::{RegressionTree, TreeNode};
pub use gradient_boosting::{GradientBoostingClassifier, GradientBoostingConfig};
pub use metrics::{ClassificationMetrics, ModelMetrics};
pub use trainer::{ModelTrainer, TrainerConfig};
pub use unit::{ModelUnit, Predictions};
