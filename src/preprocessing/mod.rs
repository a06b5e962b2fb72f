//! Feature engineering for the mental-health survey dataset
//!
//! Provides the two-mode transformation shared by training and evaluation:
//! - Identifier and duplicate removal
//! - Branch merging (job/study satisfaction, work/academic pressure)
//! - Train-derived imputation and rare-category collapsing
//! - Sleep bucketing
//! - Median/most-frequent imputation and one-hot encoding

pub mod columns;
pub mod frame;
pub mod steps;
mod encoder;
mod fitted;
mod matrix;
mod pipeline;

pub use encoder::{CategoricalColumn, ColumnEncoder, NumericColumn};
pub use fitted::{CleaningStats, FittedTransformer};
pub use matrix::FeatureMatrix;
pub use pipeline::FeatureEngineer;
