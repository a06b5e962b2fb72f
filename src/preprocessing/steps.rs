//! Cleaning steps of the feature engineer
//!
//! Each step is a pure function from one table snapshot to the next. Steps
//! skip silently when the columns they touch are absent, which makes the
//! sequence safe to re-run on an already cleaned table.

use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use super::columns;
use super::frame;
use crate::error::Result;

/// Replacement for rare or unknown City and Degree values
pub const OTHER: &str = "other";

/// Degree assumed for respondents who left it blank
pub const DEFAULT_DEGREE: &str = "B.Ed";

/// Profession assumed for non-students who left it blank
pub const DEFAULT_PROFESSION: &str = "Teacher";

/// A City value survives collapsing when seen at least this often in training
pub const CITY_MIN_COUNT: usize = 10;

/// A Degree value survives collapsing when seen at least this often in training
pub const DEGREE_MIN_COUNT: usize = 5;

/// A Dietary Habits value survives collapsing when seen at least this often in training
pub const DIETARY_MIN_COUNT: usize = 3;

pub const VERY_LOW_SLEEP: &str = "Very Low Sleep";
pub const MEDIUM_SLEEP: &str = "Medium Sleep";
pub const HIGH_SLEEP: &str = "High Sleep";
pub const VERY_HIGH_SLEEP: &str = "Very High Sleep";

/// Map a reported sleep range to its bucket
pub fn sleep_bucket(value: &str) -> Option<&'static str> {
    let bucket = match value {
        "Less than 5 hours" | "3-4 hours" => VERY_LOW_SLEEP,
        "5-6 hours" | "6-7 hours" | "9-5 hours" => MEDIUM_SLEEP,
        "7-8 hours" | "8 hours" => HIGH_SLEEP,
        "More than 8 hours" | "8-9 hours" | "9-11 hours" | "10-11 hours" => VERY_HIGH_SLEEP,
        VERY_LOW_SLEEP => VERY_LOW_SLEEP,
        MEDIUM_SLEEP => MEDIUM_SLEEP,
        HIGH_SLEEP => HIGH_SLEEP,
        VERY_HIGH_SLEEP => VERY_HIGH_SLEEP,
        _ => return None,
    };
    Some(bucket)
}

/// Canonical spelling of a dietary answer
pub fn dietary_synonym(value: &str) -> Option<&'static str> {
    match value {
        "More Healthy" => Some("Healthy"),
        "No Healthy" | "Less Healthy" | "Less than Healthy" => Some("Unhealthy"),
        _ => None,
    }
}

/// Drop identifier columns
pub fn drop_identifiers(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    frame::drop_if_present(df, &names)
}

/// Drop exact duplicate rows, keeping the first occurrence
pub fn drop_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let unique = frame::unique_rows(df)?;
    let dropped = df.height() - unique.height();
    if dropped > 0 {
        debug!(dropped, "Dropping duplicate rows");
    }
    Ok((unique, dropped))
}

/// Coalesce `first` then `second` into `target` and drop both sources.
///
/// A missing partner counts as all-null; with neither source present the
/// table is returned unchanged.
pub fn merge_columns(df: &DataFrame, first: &str, second: &str, target: &str) -> Result<DataFrame> {
    let has_first = frame::has_column(df, first);
    let has_second = frame::has_column(df, second);
    if !has_first && !has_second {
        return Ok(df.clone());
    }

    let height = df.height();
    let load = |name: &str, present: bool| -> Result<Vec<Option<f64>>> {
        if present {
            frame::numeric_values(df, name)
        } else {
            Ok(vec![None; height])
        }
    };
    let first_values = load(first, has_first)?;
    let second_values = load(second, has_second)?;
    let existing = load(target, frame::has_column(df, target))?;

    let merged: Vec<Option<f64>> = first_values
        .into_iter()
        .zip(second_values)
        .zip(existing)
        .map(|((a, b), c)| a.or(b).or(c))
        .collect();

    let result = frame::drop_if_present(df, &[first, second])?;
    frame::with_numeric_column(&result, target, merged)
}

/// Merge the professional/student branches into shared Satisfaction and Pressure columns
pub fn merge_branch_columns(df: &DataFrame) -> Result<DataFrame> {
    let df = merge_columns(
        df,
        columns::JOB_SATISFACTION,
        columns::STUDY_SATISFACTION,
        columns::SATISFACTION,
    )?;
    merge_columns(
        &df,
        columns::WORK_PRESSURE,
        columns::ACADEMIC_PRESSURE,
        columns::PRESSURE,
    )
}

fn has_cgpa_inputs(df: &DataFrame) -> bool {
    frame::has_column(df, columns::CGPA) && frame::has_column(df, columns::STATUS)
}

/// Mean CGPA over student rows
pub fn student_cgpa_mean(df: &DataFrame) -> Result<Option<f64>> {
    if !has_cgpa_inputs(df) {
        return Ok(None);
    }
    let status = frame::string_values(df, columns::STATUS)?;
    let cgpa = frame::numeric_values(df, columns::CGPA)?;
    let student_cgpa: Vec<Option<f64>> = status
        .iter()
        .zip(cgpa)
        .filter(|(s, _)| s.as_deref() == Some(columns::STUDENT))
        .map(|(_, c)| c)
        .collect();
    Ok(frame::mean(&student_cgpa))
}

/// Fill missing CGPA: professionals get 0, students get `student_fill` when given
pub fn fill_cgpa(df: &DataFrame, student_fill: Option<f64>) -> Result<DataFrame> {
    if !has_cgpa_inputs(df) {
        return Ok(df.clone());
    }
    let status = frame::string_values(df, columns::STATUS)?;
    let cgpa = frame::numeric_values(df, columns::CGPA)?;

    let filled: Vec<Option<f64>> = status
        .iter()
        .zip(cgpa)
        .map(|(s, c)| match (s.as_deref(), c) {
            (_, Some(value)) => Some(value),
            (Some(columns::WORKING_PROFESSIONAL), None) => Some(0.0),
            (Some(columns::STUDENT), None) => student_fill,
            _ => None,
        })
        .collect();
    frame::with_numeric_column(df, columns::CGPA, filled)
}

/// Means of the given columns, skipping absent or all-null ones
pub fn column_means(df: &DataFrame, names: &[&str]) -> Result<BTreeMap<String, f64>> {
    let mut means = BTreeMap::new();
    for name in names {
        if !frame::has_column(df, name) {
            continue;
        }
        if let Some(mean) = frame::mean(&frame::numeric_values(df, name)?) {
            means.insert(name.to_string(), mean);
        }
    }
    Ok(means)
}

/// Fill numeric nulls with the given per-column values
pub fn fill_numeric(df: &DataFrame, fills: &BTreeMap<String, f64>) -> Result<DataFrame> {
    let mut result = df.clone();
    for (name, fill) in fills {
        if !frame::has_column(&result, name) {
            continue;
        }
        let values: Vec<Option<f64>> = frame::numeric_values(&result, name)?
            .into_iter()
            .map(|v| v.or(Some(*fill)))
            .collect();
        result = frame::with_numeric_column(&result, name, values)?;
    }
    Ok(result)
}

/// Missing Profession: "Student" for students, the default profession otherwise
pub fn fill_profession(df: &DataFrame) -> Result<DataFrame> {
    if !frame::has_column(df, columns::PROFESSION) {
        return Ok(df.clone());
    }
    let height = df.height();
    let status = if frame::has_column(df, columns::STATUS) {
        frame::string_values(df, columns::STATUS)?
    } else {
        vec![None; height]
    };
    let profession = frame::string_values(df, columns::PROFESSION)?;

    let filled: Vec<Option<String>> = status
        .into_iter()
        .zip(profession)
        .map(|(s, p)| match (s.as_deref(), p) {
            (_, Some(value)) => Some(value),
            (Some(columns::STUDENT), None) => Some(columns::STUDENT.to_string()),
            _ => Some(DEFAULT_PROFESSION.to_string()),
        })
        .collect();
    frame::with_string_column(df, columns::PROFESSION, filled)
}

/// Replace nulls of a string column with a constant
pub fn fill_string(df: &DataFrame, name: &str, fill: &str) -> Result<DataFrame> {
    if !frame::has_column(df, name) {
        return Ok(df.clone());
    }
    let values: Vec<Option<String>> = frame::string_values(df, name)?
        .into_iter()
        .map(|v| v.or_else(|| Some(fill.to_string())))
        .collect();
    frame::with_string_column(df, name, values)
}

/// Rewrite values of a string column through `map`; unmatched values are kept
pub fn map_strings<F>(df: &DataFrame, name: &str, map: F) -> Result<DataFrame>
where
    F: Fn(&str) -> Option<&'static str>,
{
    if !frame::has_column(df, name) {
        return Ok(df.clone());
    }
    let values: Vec<Option<String>> = frame::string_values(df, name)?
        .into_iter()
        .map(|v| v.map(|s| map(&s).map(str::to_string).unwrap_or(s)))
        .collect();
    frame::with_string_column(df, name, values)
}

/// Replace values seen fewer than `min_count` times in `counts`, and nulls,
/// with `replacement`
pub fn collapse_rare(
    df: &DataFrame,
    name: &str,
    counts: &BTreeMap<String, usize>,
    min_count: usize,
    replacement: &str,
) -> Result<DataFrame> {
    if !frame::has_column(df, name) {
        return Ok(df.clone());
    }
    let values: Vec<Option<String>> = frame::string_values(df, name)?
        .into_iter()
        .map(|v| match v {
            Some(value) if counts.get(&value).copied().unwrap_or(0) >= min_count => Some(value),
            _ => Some(replacement.to_string()),
        })
        .collect();
    frame::with_string_column(df, name, values)
}

/// Frequencies of a string column, empty when the column is absent
pub fn category_counts(df: &DataFrame, name: &str) -> Result<BTreeMap<String, usize>> {
    if !frame::has_column(df, name) {
        return Ok(BTreeMap::new());
    }
    frame::value_counts(&frame::string_values(df, name)?)
}

/// Bucket Sleep Duration; unknown or missing values get `fallback`
pub fn bucket_sleep_duration(df: &DataFrame, fallback: Option<&str>) -> Result<DataFrame> {
    if !frame::has_column(df, columns::SLEEP_DURATION) {
        return Ok(df.clone());
    }
    let values: Vec<Option<String>> = frame::string_values(df, columns::SLEEP_DURATION)?
        .into_iter()
        .map(|v| {
            v.as_deref()
                .and_then(sleep_bucket)
                .or(fallback)
                .map(str::to_string)
        })
        .collect();
    frame::with_string_column(df, columns::SLEEP_DURATION, values)
}

/// Most common sleep bucket among values that map to one
pub fn sleep_mode(df: &DataFrame) -> Result<Option<String>> {
    if !frame::has_column(df, columns::SLEEP_DURATION) {
        return Ok(None);
    }
    let buckets: Vec<Option<String>> = frame::string_values(df, columns::SLEEP_DURATION)?
        .into_iter()
        .map(|v| v.as_deref().and_then(sleep_bucket).map(str::to_string))
        .collect();
    Ok(frame::mode(&frame::value_counts(&buckets)?))
}
