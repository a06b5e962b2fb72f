//! Pipeline stages and the run state machine

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MindscopeError, Result};

/// Stage of a training run, attached to errors that cross a stage boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Ingestion,
    Validation,
    Transformation,
    Training,
    Evaluation,
    Pusher,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Ingestion => "data ingestion",
            PipelineStage::Validation => "data validation",
            PipelineStage::Transformation => "data transformation",
            PipelineStage::Training => "model training",
            PipelineStage::Evaluation => "model evaluation",
            PipelineStage::Pusher => "model pusher",
        };
        f.write_str(name)
    }
}

/// Where a run stands. `Promoted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Ingested,
    Validated,
    Transformed,
    Trained,
    Evaluated,
    Promoted,
    Rejected,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Promoted | PipelineState::Rejected)
    }

    /// Move to `next`, rejecting anything but the single forward edge
    /// (or `Evaluated -> Rejected`)
    pub fn advance(self, next: PipelineState) -> Result<PipelineState> {
        use PipelineState::*;
        let allowed = matches!(
            (self, next),
            (Ingested, Validated)
                | (Validated, Transformed)
                | (Transformed, Trained)
                | (Trained, Evaluated)
                | (Evaluated, Promoted)
                | (Evaluated, Rejected)
        );
        if allowed {
            Ok(next)
        } else {
            Err(MindscopeError::TrainingError(format!(
                "Invalid pipeline transition {:?} -> {:?}",
                self, next
            )))
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Ingested => "ingested",
            PipelineState::Validated => "validated",
            PipelineState::Transformed => "transformed",
            PipelineState::Trained => "trained",
            PipelineState::Evaluated => "evaluated",
            PipelineState::Promoted => "promoted",
            PipelineState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
