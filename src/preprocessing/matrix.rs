//! Engineered feature matrix

use ndarray::{s, Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{MindscopeError, Result};

/// Dense engineered table: encoded features, optionally followed by the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    /// Name of the trailing target column, when the matrix carries one
    pub target_name: Option<String>,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    /// Build a matrix, appending `target` as the last column when given
    pub fn new(
        features: Array2<f64>,
        feature_names: Vec<String>,
        target: Option<(String, Array1<f64>)>,
    ) -> Result<Self> {
        if features.ncols() != feature_names.len() {
            return Err(MindscopeError::ShapeError {
                expected: format!("{} feature columns", feature_names.len()),
                actual: format!("{} columns", features.ncols()),
            });
        }

        match target {
            None => Ok(Self {
                feature_names,
                target_name: None,
                values: features,
            }),
            Some((name, y)) => {
                if y.len() != features.nrows() {
                    return Err(MindscopeError::ShapeError {
                        expected: format!("{} target values", features.nrows()),
                        actual: format!("{} target values", y.len()),
                    });
                }
                let mut values = Array2::<f64>::zeros((features.nrows(), features.ncols() + 1));
                values.slice_mut(s![.., ..features.ncols()]).assign(&features);
                values.column_mut(features.ncols()).assign(&y);
                Ok(Self {
                    feature_names,
                    target_name: Some(name),
                    values,
                })
            }
        }
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Total column count, target included
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.values.slice(s![.., ..self.n_features()])
    }

    pub fn target(&self) -> Option<Array1<f64>> {
        self.target_name
            .as_ref()
            .map(|_| self.values.column(self.n_features()).to_owned())
    }

    /// Target column, failing when the matrix has none
    pub fn require_target(&self) -> Result<Array1<f64>> {
        self.target().ok_or_else(|| {
            MindscopeError::DataError("Feature matrix carries no target column".to_string())
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_target_is_last_column() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let matrix = FeatureMatrix::new(
            features.clone(),
            vec!["a".into(), "b".into()],
            Some(("Depression".into(), array![0.0, 1.0])),
        )
        .unwrap();

        assert_eq!(matrix.n_columns(), 3);
        assert_eq!(matrix.features(), features.view());
        assert_eq!(matrix.target().unwrap(), array![0.0, 1.0]);
    }

    #[test]
    fn test_name_count_mismatch_rejected() {
        let result = FeatureMatrix::new(array![[1.0]], vec![], None);
        assert!(matches!(result, Err(MindscopeError::ShapeError { .. })));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("train.bin");
        let matrix = FeatureMatrix::new(array![[1.5]], vec!["a".into()], None).unwrap();

        matrix.save(&path).unwrap();
        assert_eq!(FeatureMatrix::load(&path).unwrap(), matrix);
    }
}
