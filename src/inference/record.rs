//! Typed serving request

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MindscopeError, Result};
use crate::preprocessing::columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Working Professional")]
    WorkingProfessional,
    Student,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::WorkingProfessional => columns::WORKING_PROFESSIONAL,
            Status::Student => columns::STUDENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

/// One survey answer sheet as submitted for prediction.
///
/// Field names follow the request form; [`MentalHealthRecord::to_frame`]
/// renders it with the raw dataset column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MentalHealthRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Working_Professional_or_Student")]
    pub status: Status,
    #[serde(rename = "Profession", default)]
    pub profession: Option<String>,
    #[serde(rename = "Academic_Pressure", default)]
    pub academic_pressure: Option<f64>,
    #[serde(rename = "Work_Pressure", default)]
    pub work_pressure: Option<f64>,
    #[serde(rename = "CGPA", default)]
    pub cgpa: Option<f64>,
    #[serde(rename = "Study_Satisfaction", default)]
    pub study_satisfaction: Option<f64>,
    #[serde(rename = "Job_Satisfaction", default)]
    pub job_satisfaction: Option<f64>,
    #[serde(rename = "Sleep_Duration")]
    pub sleep_duration: String,
    #[serde(rename = "Dietary_Habits")]
    pub dietary_habits: String,
    #[serde(rename = "Degree")]
    pub degree: String,
    #[serde(rename = "Suicidal_Thoughts")]
    pub suicidal_thoughts: YesNo,
    #[serde(rename = "Work_Study_Hours")]
    pub work_study_hours: f64,
    #[serde(rename = "Financial_Stress")]
    pub financial_stress: f64,
    #[serde(rename = "Family_History")]
    pub family_history: YesNo,
}

// blank form fields are treated as missing answers
fn text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn opt_text(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(text)
}

impl MentalHealthRecord {
    /// Reject values deserialization cannot rule out
    pub fn validate(&self) -> Result<()> {
        let numbers = [
            ("Age", Some(self.age)),
            ("Academic_Pressure", self.academic_pressure),
            ("Work_Pressure", self.work_pressure),
            ("CGPA", self.cgpa),
            ("Study_Satisfaction", self.study_satisfaction),
            ("Job_Satisfaction", self.job_satisfaction),
            ("Work_Study_Hours", Some(self.work_study_hours)),
            ("Financial_Stress", Some(self.financial_stress)),
        ];
        for (field, value) in numbers {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(MindscopeError::InferenceError(format!(
                        "{} must be a non-negative number, got {}",
                        field, v
                    )));
                }
            }
        }
        if text(&self.gender).is_none() {
            return Err(MindscopeError::InferenceError("Gender is required".to_string()));
        }
        Ok(())
    }

    /// One-row table with the raw dataset column names
    pub fn to_frame(&self) -> Result<DataFrame> {
        let string = |name: &str, value: Option<String>| Column::new(name.into(), vec![value]);
        let number = |name: &str, value: Option<f64>| Column::new(name.into(), vec![value]);

        let frame = DataFrame::new(vec![
            string(columns::NAME, text(&self.name)),
            string(columns::GENDER, text(&self.gender)),
            number(columns::AGE, Some(self.age)),
            string(columns::CITY, text(&self.city)),
            string(columns::STATUS, Some(self.status.as_str().to_string())),
            string(columns::PROFESSION, opt_text(&self.profession)),
            number(columns::ACADEMIC_PRESSURE, self.academic_pressure),
            number(columns::WORK_PRESSURE, self.work_pressure),
            number(columns::CGPA, self.cgpa),
            number(columns::STUDY_SATISFACTION, self.study_satisfaction),
            number(columns::JOB_SATISFACTION, self.job_satisfaction),
            string(columns::SLEEP_DURATION, text(&self.sleep_duration)),
            string(columns::DIETARY_HABITS, text(&self.dietary_habits)),
            string(columns::DEGREE, text(&self.degree)),
            string(
                columns::SUICIDAL_THOUGHTS,
                Some(self.suicidal_thoughts.as_str().to_string()),
            ),
            number(columns::WORK_STUDY_HOURS, Some(self.work_study_hours)),
            number(columns::FINANCIAL_STRESS, Some(self.financial_stress)),
            string(
                columns::FAMILY_HISTORY,
                Some(self.family_history.as_str().to_string()),
            ),
        ])?;
        Ok(frame)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::preprocessing::frame;

    pub(crate) fn student() -> MentalHealthRecord {
        serde_json::from_value(serde_json::json!({
            "Name": "Aarav",
            "Gender": "Male",
            "Age": 21,
            "City": "Pune",
            "Working_Professional_or_Student": "Student",
            "Academic_Pressure": 4,
            "CGPA": 7.5,
            "Study_Satisfaction": 2,
            "Sleep_Duration": "5-6 hours",
            "Dietary_Habits": "More Healthy",
            "Degree": "B.Tech",
            "Suicidal_Thoughts": "Yes",
            "Work_Study_Hours": 8,
            "Financial_Stress": 3,
            "Family_History": "No"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_with_optional_fields_missing() {
        let record = student();
        assert_eq!(record.status, Status::Student);
        assert_eq!(record.profession, None);
        assert_eq!(record.work_pressure, None);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_closed_fields_rejected() {
        let mut value = serde_json::to_value(student()).unwrap();
        value["Working_Professional_or_Student"] = serde_json::json!("Retired");
        assert!(serde_json::from_value::<MentalHealthRecord>(value).is_err());

        let mut value = serde_json::to_value(student()).unwrap();
        value["Family_History"] = serde_json::json!("Maybe");
        assert!(serde_json::from_value::<MentalHealthRecord>(value).is_err());
    }

    #[test]
    fn test_negative_number_rejected() {
        let mut record = student();
        record.financial_stress = -1.0;
        assert!(matches!(record.validate(), Err(MindscopeError::InferenceError(_))));
    }

    #[test]
    fn test_to_frame_uses_dataset_columns() {
        let mut record = student();
        record.degree = "  ".to_string();
        let df = record.to_frame().unwrap();

        assert_eq!(df.shape(), (1, 18));
        assert_eq!(
            frame::string_values(&df, "Working Professional or Student").unwrap(),
            vec![Some("Student".to_string())]
        );
        assert_eq!(frame::string_values(&df, "Degree").unwrap(), vec![None]);
        assert_eq!(frame::numeric_values(&df, "Job Satisfaction").unwrap(), vec![None]);
    }
}
