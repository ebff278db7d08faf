//! Pipeline module.
//!
//! This module runs the prepare and report passes and reports their progress.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder, run_prepare, run_report};
pub use progress::{AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
