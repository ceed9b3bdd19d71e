//! Pipeline orchestration
//!
//! Owns the run state machine and sequences the research and planning
//! stages for one request at a time. Concurrent runs share nothing but the
//! [`Capabilities`] factory.

mod capabilities;
mod orchestrator;
mod state;

pub use capabilities::{Capabilities, HttpCapabilities};
pub use orchestrator::Orchestrator;
pub use state::{PipelineOutcome, PipelinePhase, PipelineRun};
