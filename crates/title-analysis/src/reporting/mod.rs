//! Report generation module.
//!
//! This module computes the statistics of the report pass and writes them as
//! ordered text (`analysis_output.txt`) and, on request, as JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use title_analysis::reporting::{AnalysisReport, ReportGenerator, render_text};
//!
//! let report = AnalysisReport::build(&cleaned, &cleaned_path, &config)?;
//! println!("{}", render_text(&report));
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_text(&report, "analysis_output.txt")?;
//! generator.write_json(&report)?;
//! ```
//!
//! Category rankings are ordered by count descending; equal counts are
//! ordered by label ascending.

mod generator;
pub mod statistics;

pub use generator::{AnalysisReport, ReportGenerator, render_text};
pub use statistics::{
    CategoryCount, ColumnDescription, ColumnInfo, DurationAnalysis, DurationStats, Insights,
    YearCount,
};
