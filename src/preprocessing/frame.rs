//! Column access helpers shared by the transform steps
//!
//! Every step works on a normalized frame: numeric columns are `Float64`,
//! everything else is `String`. Helpers return owned vectors so a step can
//! build a replacement column without touching its input frame.

use polars::prelude::*;
use std::collections::BTreeMap;

use crate::error::{MindscopeError, Result};

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Cast numeric columns to `Float64` and every other column to `String`
pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    for col in df.get_columns() {
        let target = if is_numeric_dtype(col.dtype()) {
            DataType::Float64
        } else {
            DataType::String
        };
        if col.dtype() != &target {
            let casted = col.cast(&target)?;
            result.with_column(casted)?;
        }
    }
    Ok(result)
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Values of a column as optional strings
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = df
        .column(name)
        .map_err(|_| MindscopeError::FeatureNotFound(name.to_string()))?;
    let casted = col.cast(&DataType::String)?;
    let values = casted
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Values of a column as optional floats; unparseable cells become null
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(name)
        .map_err(|_| MindscopeError::FeatureNotFound(name.to_string()))?;
    let casted = col.cast(&DataType::Float64)?;
    let values = casted
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Copy of `df` with `name` set to the given string values (appended if absent)
pub fn with_string_column(df: &DataFrame, name: &str, values: Vec<Option<String>>) -> Result<DataFrame> {
    let mut result = df.clone();
    result.with_column(Column::new(name.into(), values))?;
    Ok(result)
}

/// Copy of `df` with `name` set to the given numeric values (appended if absent)
pub fn with_numeric_column(df: &DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<DataFrame> {
    let mut result = df.clone();
    result.with_column(Column::new(name.into(), values))?;
    Ok(result)
}

/// Copy of `df` without the named columns; absent names are ignored
pub fn drop_if_present(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    let mut result = df.clone();
    for name in names {
        if has_column(&result, name) {
            result = result.drop(name)?;
        }
    }
    Ok(result)
}

/// Copy of `df` keeping only rows where `keep` is true
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    if keep.len() != df.height() {
        return Err(MindscopeError::ShapeError {
            expected: format!("{} row flags", df.height()),
            actual: format!("{} row flags", keep.len()),
        });
    }
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Copy of `df` keeping the first occurrence of every distinct row
pub fn unique_rows(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Frequency of every non-null value
pub fn value_counts(values: &[Option<String>]) -> Result<BTreeMap<String, usize>> {
    let series = Series::new("value".into(), values);
    let counted = series.value_counts(false, false, "count".into(), false)?;

    let keys = counted.column("value")?.as_materialized_series().str()?;
    let counts = counted.column("count")?.cast(&DataType::UInt64)?;
    let counts = counts.as_materialized_series().u64()?;

    Ok(keys
        .into_iter()
        .zip(counts)
        .filter_map(|(key, count)| Some((key?.to_string(), count? as usize)))
        .collect())
}

/// Most frequent value; ties resolve to the lexicographically smallest
pub fn mode(counts: &BTreeMap<String, usize>) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for (value, &count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.clone())
}

fn float_chunked(values: &[Option<f64>]) -> Float64Chunked {
    Float64Chunked::new("value".into(), values)
}

/// Mean of the non-null values
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    float_chunked(values).mean()
}

/// Median of the non-null values
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    float_chunked(values).median()
}
