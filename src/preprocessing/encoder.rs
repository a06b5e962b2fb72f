//! Column encoder: imputation plus one-hot encoding into a dense matrix

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::frame;
use crate::error::{MindscopeError, Result};

/// Numeric pass-through column with its median fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub median: f64,
}

/// One-hot block of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    /// Most frequent training value, used for nulls
    pub most_frequent: Option<String>,
    /// Sorted training vocabulary; one output column per entry
    pub categories: Vec<String>,
}

impl CategoricalColumn {
    fn indicator_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(move |cat| format!("{}_{}", self.name, cat))
    }
}

/// Median/most-frequent imputer followed by a one-hot encoder.
///
/// Numeric columns come first in the output, then every categorical block,
/// both in declaration order. A value outside the training vocabulary
/// encodes as an all-zero block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnEncoder {
    numeric: Vec<NumericColumn>,
    categorical: Vec<CategoricalColumn>,
    is_fitted: bool,
}

impl ColumnEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn medians, modes and vocabularies from a cleaned training table
    pub fn fit(
        &mut self,
        df: &polars::prelude::DataFrame,
        numeric: &[String],
        categorical: &[String],
    ) -> Result<&mut Self> {
        self.numeric = numeric
            .iter()
            .map(|name| {
                let values = frame::numeric_values(df, name)?;
                let median = frame::median(&values).unwrap_or_else(|| {
                    warn!(column = %name, "Numeric feature has no values; imputing 0");
                    0.0
                });
                Ok(NumericColumn {
                    name: name.clone(),
                    median,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.categorical = categorical
            .iter()
            .map(|name| {
                let counts = frame::value_counts(&frame::string_values(df, name)?)?;
                Ok(CategoricalColumn {
                    name: name.clone(),
                    most_frequent: frame::mode(&counts),
                    categories: counts.into_keys().collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode a cleaned table into a `rows x feature_names().len()` matrix
    pub fn transform(&self, df: &polars::prelude::DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(MindscopeError::ModelNotFitted);
        }

        let n_rows = df.height();
        let mut output = Array2::<f64>::zeros((n_rows, self.n_features()));
        let mut offset = 0;

        for column in &self.numeric {
            let values = frame::numeric_values(df, &column.name)?;
            for (row, value) in values.into_iter().enumerate() {
                output[[row, offset]] = value.unwrap_or(column.median);
            }
            offset += 1;
        }

        for column in &self.categorical {
            let values = frame::string_values(df, &column.name)?;
            for (row, value) in values.into_iter().enumerate() {
                let value = value.or_else(|| column.most_frequent.clone());
                if let Some(value) = value {
                    if let Ok(idx) = column.categories.binary_search(&value) {
                        output[[row, offset + idx]] = 1.0;
                    }
                }
            }
            offset += column.categories.len();
        }

        Ok(output)
    }

    /// Output column names: numeric names, then `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|c| c.name.clone()).collect();
        for column in &self.categorical {
            names.extend(column.indicator_names());
        }
        names
    }

    pub fn n_features(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    pub fn numeric_columns(&self) -> &[NumericColumn] {
        &self.numeric
    }

    pub fn categorical_columns(&self) -> &[CategoricalColumn] {
        &self.categorical
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
