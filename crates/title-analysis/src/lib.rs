//! Title Catalogue Analysis Library
//!
//! Cleaning, descriptive statistics and charts for streaming catalogue title
//! datasets (one row per movie or TV show), built with Rust and Polars.
//!
//! # Overview
//!
//! The work is split into two passes that run as separate binaries:
//!
//! - **Prepare** (`title-prepare`): load the raw table, or synthesize a seeded
//!   sample when it is absent, apply the per-column cleaning policies and write
//!   the cleaned export
//! - **Report** (`title-report`): read the cleaned export back, compute counts,
//!   rankings and summary statistics, write the text report and render charts
//!
//! The report pass depends on the export of the prepare pass. When the export
//! is missing it fails before writing anything.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use title_analysis::{AnalysisConfig, Pipeline};
//!
//! let config = AnalysisConfig::builder()
//!     .input_path("Netflix_shows_movies.csv")
//!     .output_dir("output")
//!     .top_n(10)
//!     .build()?;
//!
//! let pipeline = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("[{}] {}", update.stage.display_name(), update.message))
//!     .build()?;
//!
//! let prepared = pipeline.prepare()?;
//! println!("{} rows after cleaning", prepared.summary.rows_after);
//!
//! let reported = pipeline.report()?;
//! println!("Report: {}", reported.report_path.display());
//! ```
//!
//! # Cleaning Policies
//!
//! Every catalogue column has a fixed policy, see [`schema::COLUMNS`]:
//!
//! - `show_id`, `type`, `title`, `release_year`, `rating`: the row is dropped
//!   when the value is missing or invalid
//! - `director`, `cast`, `country`, `listed_in`: missing values are filled with
//!   a placeholder ("No Director", "Unknown", "Uncategorized")
//! - `date_added`, `duration`, `description`: kept as-is, missing allowed
//! - `year_added`, `month_added`: derived from `date_added`
//!
//! Cleaning is idempotent.

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod exporter;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::{ChartOutcome, ChartRenderer};
pub use cleaner::TitleCleaner;
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use exporter::CsvExporter;
pub use loader::{DataLoader, SyntheticGenerator};
pub use logging::init_logging;
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate, run_prepare, run_report,
};
pub use reporting::{AnalysisReport, CategoryCount, ReportGenerator, YearCount};
pub use schema::{ColumnPolicy, TitleType};
pub use types::{
    CleaningSummary, ColumnMissing, DataSource, DropReason, LoadedDataset, PrepareOutcome,
    ReportOutcome,
};
