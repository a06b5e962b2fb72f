//! Staged training pipeline
//!
//! ingestion → validation → transformation → training → evaluation → pusher,
//! strictly sequential with artifact hand-off between stages.

mod state;
mod training;

pub use state::{PipelineStage, PipelineState};
pub use training::{PipelineRun, TrainPipeline};
