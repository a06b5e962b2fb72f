//! Column names of the raw survey dataset and of the engineered table

pub const ID: &str = "id";
pub const DOCUMENT_ID: &str = "_id";
pub const NAME: &str = "Name";
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const CITY: &str = "City";
pub const STATUS: &str = "Working Professional or Student";
pub const PROFESSION: &str = "Profession";
pub const ACADEMIC_PRESSURE: &str = "Academic Pressure";
pub const WORK_PRESSURE: &str = "Work Pressure";
pub const CGPA: &str = "CGPA";
pub const STUDY_SATISFACTION: &str = "Study Satisfaction";
pub const JOB_SATISFACTION: &str = "Job Satisfaction";
pub const SLEEP_DURATION: &str = "Sleep Duration";
pub const DIETARY_HABITS: &str = "Dietary Habits";
pub const DEGREE: &str = "Degree";
pub const SUICIDAL_THOUGHTS: &str = "Have you ever had suicidal thoughts ?";
pub const WORK_STUDY_HOURS: &str = "Work/Study Hours";
pub const FINANCIAL_STRESS: &str = "Financial Stress";
pub const FAMILY_HISTORY: &str = "Family History of Mental Illness";
pub const DEPRESSION: &str = "Depression";

// Produced by the branch merge step
pub const SATISFACTION: &str = "Satisfaction";
pub const PRESSURE: &str = "Pressure";

pub const STUDENT: &str = "Student";
pub const WORKING_PROFESSIONAL: &str = "Working Professional";

/// Numeric columns whose remaining nulls get the training mean
pub const MEAN_FILLED: [&str; 3] = [FINANCIAL_STRESS, SATISFACTION, PRESSURE];
