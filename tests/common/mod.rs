//! Synthetic survey tables shared by the integration tests

#![allow(dead_code)]

use polars::prelude::*;

const CITIES: [&str; 3] = ["Pune", "Delhi", "Mumbai"];
const SLEEP: [&str; 5] = [
    "Less than 5 hours",
    "5-6 hours",
    "7-8 hours",
    "More than 8 hours",
    "9-5 hours",
];
const DIETARY: [&str; 4] = ["Healthy", "Moderate", "Unhealthy", "More Healthy"];
const DEGREES: [&str; 4] = ["B.Ed", "B.Tech", "MSc", "Class 12"];

/// Depression label of row `i`: suicidal thoughts plus high financial stress.
/// The suicidal-thoughts answer is the only column that follows the parity
/// of `i`, so no other answer can stand in for the label.
pub fn label(i: usize) -> i64 {
    i64::from(i % 2 == 0 && i % 5 >= 2)
}

/// `n` unique survey rows with every raw column of the dataset
pub fn survey_table(n: usize) -> DataFrame {
    let mut ids = Vec::with_capacity(n);
    let mut names = Vec::with_capacity(n);
    let mut genders = Vec::with_capacity(n);
    let mut ages = Vec::with_capacity(n);
    let mut cities = Vec::with_capacity(n);
    let mut status = Vec::with_capacity(n);
    let mut professions: Vec<Option<&str>> = Vec::with_capacity(n);
    let mut academic_pressure = Vec::with_capacity(n);
    let mut work_pressure = Vec::with_capacity(n);
    let mut cgpa = Vec::with_capacity(n);
    let mut study_satisfaction = Vec::with_capacity(n);
    let mut job_satisfaction = Vec::with_capacity(n);
    let mut sleep = Vec::with_capacity(n);
    let mut dietary = Vec::with_capacity(n);
    let mut degrees = Vec::with_capacity(n);
    let mut suicidal = Vec::with_capacity(n);
    let mut hours = Vec::with_capacity(n);
    let mut financial = Vec::with_capacity(n);
    let mut family = Vec::with_capacity(n);
    let mut depression = Vec::with_capacity(n);

    for i in 0..n {
        let student = i % 3 == 0;
        ids.push(i as i64);
        names.push(format!("Person{}", i));
        genders.push(if i % 3 == 1 { "Male" } else { "Female" });
        ages.push(18.0 + ((i / 2 * 7) % 40) as f64);
        cities.push(if i % 37 == 0 { "Agra" } else { CITIES[i % CITIES.len()] });
        status.push(if student { "Student" } else { "Working Professional" });
        professions.push(match (student, i % 11 == 0) {
            (true, _) => None,
            (false, true) => None,
            (false, false) => Some(if i % 7 < 4 { "Teacher" } else { "Engineer" }),
        });

        let pressure = ((i * 3) % 5 + 1) as f64;
        let satisfaction = ((i * 2) % 5 + 1) as f64;
        if student {
            academic_pressure.push(Some(pressure));
            work_pressure.push(None);
            cgpa.push(if i % 13 == 0 { None } else { Some(5.0 + (i % 5) as f64) });
            study_satisfaction.push(Some(satisfaction));
            job_satisfaction.push(None);
        } else {
            academic_pressure.push(None);
            work_pressure.push(Some(pressure));
            cgpa.push(None);
            study_satisfaction.push(None);
            job_satisfaction.push(Some(satisfaction));
        }

        sleep.push(SLEEP[i % SLEEP.len()]);
        dietary.push(if i % 17 == 0 { None } else { Some(DIETARY[(i / 2) % DIETARY.len()]) });
        degrees.push(if i % 19 == 0 { None } else { Some(DEGREES[(i / 3) % DEGREES.len()]) });
        suicidal.push(if i % 2 == 0 { "Yes" } else { "No" });
        hours.push(((i / 2) % 12) as f64);
        financial.push(if i % 23 == 0 { None } else { Some((i % 5 + 1) as f64) });
        family.push(if i % 4 < 2 { "Yes" } else { "No" });
        depression.push(label(i));
    }

    df!(
        "id" => ids,
        "Name" => names,
        "Gender" => genders,
        "Age" => ages,
        "City" => cities,
        "Working Professional or Student" => status,
        "Profession" => professions,
        "Academic Pressure" => academic_pressure,
        "Work Pressure" => work_pressure,
        "CGPA" => cgpa,
        "Study Satisfaction" => study_satisfaction,
        "Job Satisfaction" => job_satisfaction,
        "Sleep Duration" => sleep,
        "Dietary Habits" => dietary,
        "Degree" => degrees,
        "Have you ever had suicidal thoughts ?" => suicidal,
        "Work/Study Hours" => hours,
        "Financial Stress" => financial,
        "Family History of Mental Illness" => family,
        "Depression" => depression
    )
    .unwrap()
}

/// Write `df` as `<dir>/<collection>.csv`
pub fn write_collection(dir: &std::path::Path, collection: &str, df: &DataFrame) {
    mindscope::data::write_csv(df, dir.join(format!("{}.csv", collection))).unwrap();
}

/// Train a small model unit on `rows` synthetic survey rows
pub fn trained_unit(rows: usize) -> mindscope::training::ModelUnit {
    use mindscope::config::SchemaSpec;
    use mindscope::preprocessing::FeatureEngineer;
    use mindscope::training::{ModelTrainer, TrainerConfig};

    let table = survey_table(rows);
    let (train, fitted) = FeatureEngineer::new(SchemaSpec::default()).fit_transform(&table).unwrap();
    let test = FeatureEngineer::apply(&table.head(Some(20)), &fitted).unwrap();
    let trainer = ModelTrainer::new(TrainerConfig::default().with_n_estimators(50));
    trainer.train(&train, &test, fitted).unwrap().0
}

/// Request body for a survey answer sheet
pub fn record_json(suicidal: &str, financial_stress: f64) -> serde_json::Value {
    serde_json::json!({
        "Name": "Kavya",
        "Gender": "Female",
        "Age": 29,
        "City": "Delhi",
        "Working_Professional_or_Student": "Working Professional",
        "Profession": "Teacher",
        "Work_Pressure": 3,
        "Job_Satisfaction": 2,
        "Sleep_Duration": "7-8 hours",
        "Dietary_Habits": "Moderate",
        "Degree": "B.Ed",
        "Suicidal_Thoughts": suicidal,
        "Work_Study_Hours": 6,
        "Financial_Stress": financial_stress,
        "Family_History": "Yes"
    })
}
