//! Online prediction for single survey records
//!
//! - Typed request records validated at deserialization
//! - Serving-time cleaning with fixed constants
//! - A predictor sharing the production model unit read-only

mod predictor;
mod record;
mod serving;

pub use predictor::{Predictor, RiskPrediction, HIGH_RISK, LOW_RISK};
pub use record::{MentalHealthRecord, Status, YesNo};
pub use serving::{ServingTransformer, DEFAULT_DIETARY, DEFAULT_SLEEP};
