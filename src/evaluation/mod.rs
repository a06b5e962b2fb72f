//! Promotion gate and publisher
//!
//! The evaluator compares a freshly trained challenger with the production
//! model on the same held-out data; the pusher publishes an accepted
//! challenger to the single production slot.

mod evaluator;
mod pusher;

pub use evaluator::{decide, ModelEvaluator};
pub use pusher::ModelPusher;
