//! Integration test: feature engineering rules and train/apply consistency

mod common;

use mindscope::config::SchemaSpec;
use mindscope::preprocessing::{frame, CleaningStats, FeatureEngineer};
use mindscope::MindscopeError;
use polars::prelude::*;

fn schema(categorical: &[&str]) -> SchemaSpec {
    SchemaSpec {
        num_features: vec!["Age".into()],
        categorical_features: categorical.iter().map(|s| s.to_string()).collect(),
        ..SchemaSpec::default()
    }
}

fn ages(n: usize) -> Vec<f64> {
    (0..n).map(|i| 20.0 + i as f64).collect()
}

fn labels(n: usize) -> Vec<i64> {
    (0..n).map(|i| (i % 2) as i64).collect()
}

fn categories(fitted: &mindscope::preprocessing::FittedTransformer) -> Vec<String> {
    fitted.encoder().categorical_columns()[0].categories.clone()
}

#[test]
fn test_cgpa_rules() {
    let df = df!(
        "Working Professional or Student" => &["Student", "Student", "Student", "Working Professional"],
        "CGPA" => &[Some(6.0), Some(8.0), None, None],
        "Depression" => &[0i64, 1, 0, 1]
    )
    .unwrap();

    let (cleaned, stats) = CleaningStats::learn(&df).unwrap();
    assert_eq!(stats.student_cgpa_mean, Some(7.0));
    assert_eq!(
        frame::numeric_values(&cleaned, "CGPA").unwrap(),
        vec![Some(6.0), Some(8.0), Some(7.0), Some(0.0)]
    );
}

#[test]
fn test_student_cgpa_mean_reused_on_test_partition() {
    let train = df!(
        "Working Professional or Student" => &["Student", "Student", "Student", "Working Professional"],
        "CGPA" => &[Some(6.0), Some(8.0), None, None],
        "Depression" => &[0i64, 1, 0, 1]
    )
    .unwrap();
    let schema = SchemaSpec {
        num_features: vec!["CGPA".into()],
        categorical_features: vec![],
        ..SchemaSpec::default()
    };
    let (_, fitted) = FeatureEngineer::new(schema).fit_transform(&train).unwrap();

    // the test partition's own student mean would be 2.0
    let test = df!(
        "Working Professional or Student" => &["Student", "Student", "Working Professional"],
        "CGPA" => &[Some(2.0), None, None]
    )
    .unwrap();

    let cleaned = fitted.clean(&test).unwrap();
    assert_eq!(
        frame::numeric_values(&cleaned, "CGPA").unwrap(),
        vec![Some(2.0), Some(7.0), Some(0.0)]
    );

    let matrix = FeatureEngineer::apply(&test, &fitted).unwrap();
    let cgpa = matrix.feature_names.iter().position(|n| n == "CGPA").unwrap();
    assert_eq!(matrix.values.column(cgpa).to_vec(), vec![2.0, 7.0, 0.0]);
}

#[test]
fn test_city_threshold_keeps_ten_collapses_nine() {
    let n = 19;
    let cities: Vec<&str> = (0..n).map(|i| if i < 10 { "Pune" } else { "Agra" }).collect();
    let df = df!("Age" => ages(n), "City" => cities, "Depression" => labels(n)).unwrap();

    let (_, fitted) = FeatureEngineer::new(schema(&["City"])).fit_transform(&df).unwrap();
    assert_eq!(categories(&fitted), vec!["Pune".to_string(), "other".to_string()]);

    // unseen and rare cities both land in "other"
    let serve = df!("Age" => &[30.0, 31.0], "City" => &["Agra", "Goa"]).unwrap();
    let matrix = FeatureEngineer::apply(&serve, &fitted).unwrap();
    let other = matrix.feature_names.iter().position(|n| n == "City_other").unwrap();
    assert_eq!(matrix.values[[0, other]], 1.0);
    assert_eq!(matrix.values[[1, other]], 1.0);
}

#[test]
fn test_degree_threshold_keeps_five_collapses_four() {
    let n = 10;
    let degrees: Vec<Option<&str>> = (0..n)
        .map(|i| match i {
            0..=4 => Some("B.Tech"),
            5..=8 => Some("MSc"),
            _ => None,
        })
        .collect();
    let df = df!("Age" => ages(n), "Degree" => degrees, "Depression" => labels(n)).unwrap();

    let (_, fitted) = FeatureEngineer::new(schema(&["Degree"])).fit_transform(&df).unwrap();
    assert_eq!(categories(&fitted), vec!["B.Tech".to_string(), "other".to_string()]);
    assert_eq!(fitted.stats().degree_counts.get("B.Ed"), Some(&1));
}

#[test]
fn test_dietary_threshold_keeps_three_collapses_two() {
    let values = [
        Some("Healthy"),
        Some("Healthy"),
        Some("Healthy"),
        Some("More Healthy"),
        Some("Moderate"),
        Some("Moderate"),
        Some("Moderate"),
        Some("Odd"),
        Some("Odd"),
        None,
    ];
    let n = values.len();
    let df = df!("Age" => ages(n), "Dietary Habits" => values.to_vec(), "Depression" => labels(n)).unwrap();

    let (cleaned, stats) = CleaningStats::learn(&df).unwrap();
    assert_eq!(stats.dietary_mode.as_deref(), Some("Healthy"));
    assert_eq!(stats.dietary_counts.get("Healthy"), Some(&4));

    let dietary = frame::string_values(&cleaned, "Dietary Habits").unwrap();
    assert_eq!(dietary[7].as_deref(), Some("Healthy"));
    assert_eq!(dietary[9].as_deref(), Some("Healthy"));
    assert_eq!(dietary[4].as_deref(), Some("Moderate"));
}

#[test]
fn test_sleep_buckets_and_unmapped_fallback() {
    let df = df!(
        "Sleep Duration" => &["7-8 hours", "8 hours", "7-8 hours", "9-5 hours", "irregular"],
        "Depression" => &[0i64, 1, 0, 1, 0]
    )
    .unwrap();

    let (cleaned, stats) = CleaningStats::learn(&df).unwrap();
    assert_eq!(stats.sleep_mode.as_deref(), Some("High Sleep"));
    assert_eq!(
        frame::string_values(&cleaned, "Sleep Duration").unwrap(),
        vec![
            Some("High Sleep".to_string()),
            Some("High Sleep".to_string()),
            Some("High Sleep".to_string()),
            Some("Medium Sleep".to_string()),
            Some("High Sleep".to_string()),
        ]
    );
}

#[test]
fn test_cleaning_is_idempotent() {
    let df = frame::normalize(&common::survey_table(100)).unwrap();
    let (cleaned, stats) = CleaningStats::learn(&df).unwrap();
    let again = stats.apply(&cleaned).unwrap();
    assert!(again.equals_missing(&cleaned));
}

#[test]
fn test_end_to_end_layout_and_reproduction() {
    let table = common::survey_table(100);
    let engineer = FeatureEngineer::new(SchemaSpec::default());
    let (matrix, fitted) = engineer.fit_transform(&table).unwrap();

    let one_hot: usize = fitted
        .encoder()
        .categorical_columns()
        .iter()
        .map(|c| c.categories.len())
        .sum();
    let numeric = fitted.encoder().numeric_columns().len();
    assert_eq!(numeric, 6);
    assert_eq!(matrix.n_features(), numeric + one_hot);
    assert_eq!(matrix.n_columns(), matrix.n_features() + 1);
    assert_eq!(matrix.n_rows(), 100);
    assert_eq!(matrix.feature_names, fitted.feature_names());

    let target = matrix.target().unwrap();
    let expected: Vec<f64> = (0..100).map(|i| common::label(i) as f64).collect();
    assert_eq!(target.to_vec(), expected);

    let reproduced = FeatureEngineer::apply(&table, &fitted).unwrap();
    assert_eq!(reproduced.feature_names, matrix.feature_names);
    assert_eq!(reproduced.values, matrix.values);
}

#[test]
fn test_apply_without_target() {
    let table = common::survey_table(60);
    let (_, fitted) = FeatureEngineer::new(SchemaSpec::default()).fit_transform(&table).unwrap();

    let unlabeled = table.drop("Depression").unwrap();
    let matrix = FeatureEngineer::apply(&unlabeled, &fitted).unwrap();
    assert!(matrix.target().is_none());
    assert_eq!(matrix.n_columns(), fitted.n_features());
}

#[test]
fn test_duplicates_dropped_before_fitting() {
    let table = common::survey_table(30);
    let doubled = table.vstack(&table.head(Some(5))).unwrap();
    let (matrix, _) = FeatureEngineer::new(SchemaSpec::default()).fit_transform(&doubled).unwrap();
    assert_eq!(matrix.n_rows(), 30);
}

#[test]
fn test_missing_target_rejected() {
    let table = common::survey_table(20).drop("Depression").unwrap();
    let err = FeatureEngineer::new(SchemaSpec::default()).fit_transform(&table).unwrap_err();
    assert!(matches!(err, MindscopeError::MissingTarget(_)));
}
