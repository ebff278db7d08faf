//! Progress reporting for the two analysis passes.
//!
//! # Example
//!
//! ```rust,ignore
//! use title_analysis::Pipeline;
//!
//! let outcome = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("[{}] {}", update.stage.display_name(), update.message))
//!     .build()?
//!     .prepare()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the prepare and report passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Reading the raw file or synthesizing rows (pass 1), or the cleaned export (pass 2)
    Loading,
    /// Applying the column policies
    Cleaning,
    /// Writing the cleaned export
    Exporting,
    /// Computing counts, rankings and summary statistics
    Computing,
    /// Rendering PNG charts
    Charting,
    /// Writing the text and JSON reports
    Writing,
    /// Pass finished successfully
    Complete,
    /// Pass stopped with an error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Cleaning => "Cleaning Data",
            Self::Exporting => "Exporting Data",
            Self::Computing => "Computing Statistics",
            Self::Charting => "Generating Charts",
            Self::Writing => "Writing Reports",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: AnalysisStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(AnalysisStage::Complete, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(AnalysisStage::Failed, message)
    }
}

/// Receives progress updates from a running pass.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_reporter_receives_updates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = ClosureProgressReporter::new(move |update: ProgressUpdate| {
            sink.lock().unwrap().push(update.stage);
        });

        reporter.report(ProgressUpdate::new(AnalysisStage::Loading, "Loading"));
        reporter.report(ProgressUpdate::complete("done"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![AnalysisStage::Loading, AnalysisStage::Complete]
        );
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(AnalysisStage::Charting.display_name(), "Generating Charts");
        assert!(AnalysisStage::Failed.is_terminal());
        assert!(!AnalysisStage::Writing.is_terminal());
    }
}
