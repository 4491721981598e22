pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{grid_axes, run_harness, run_harness_reported};
pub use types::{HarnessStage, ProgressReporter};
