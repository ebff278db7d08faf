use crate::reporting::AnalysisReport;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Parsed from a delimited file.
    File { path: PathBuf },
    /// Generated from a seeded random generator.
    Synthetic { seed: u64, rows: usize },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => write!(f, "file {}", path.display()),
            Self::Synthetic { seed, rows } => {
                write!(f, "synthetic sample ({} rows, seed {})", rows, seed)
            }
        }
    }
}

/// A dataset as returned by the loader.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub data: DataFrame,
    pub source: DataSource,
}

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Why a row was removed by the cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingIdentifier,
    InvalidType,
    MissingTitle,
    InvalidReleaseYear,
    MissingRating,
}

impl DropReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingIdentifier => "missing show_id",
            Self::InvalidType => "missing or unrecognized type",
            Self::MissingTitle => "missing title",
            Self::InvalidReleaseYear => "missing or invalid release_year",
            Self::MissingRating => "missing rating",
        }
    }
}

/// Summary of what one cleaning run did.
///
/// The cleaner fills this while it works; pass 1 prints it and logs it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Number of rows before cleaning.
    pub rows_before: usize,
    /// Number of rows after cleaning.
    pub rows_after: usize,
    /// Missing values per column before cleaning, in canonical order.
    pub missing_before: Vec<ColumnMissing>,
    /// Placeholder fills per column.
    pub filled: Vec<ColumnMissing>,
    /// Rows removed per reason. A row is counted under its first failing rule.
    pub dropped: Vec<(DropReason, usize)>,
    /// Type labels rewritten to their canonical spelling.
    pub types_normalized: usize,
    /// Non-missing `date_added` values that could not be parsed.
    pub unparsed_dates: usize,
    /// Human-readable actions, in the order they were applied.
    pub actions: Vec<String>,
}

impl CleaningSummary {
    /// Number of rows removed.
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Percentage of rows removed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed() as f32 / self.rows_before as f32) * 100.0
        }
    }

    /// Total placeholder fills across columns.
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|c| c.missing).sum()
    }

    /// True when the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.rows_removed() == 0 && self.total_filled() == 0 && self.types_normalized == 0
    }
}

/// Result of pass 1.
#[derive(Debug, Clone)]
pub struct PrepareOutcome {
    pub source: DataSource,
    pub cleaned: DataFrame,
    pub summary: CleaningSummary,
    pub export_path: PathBuf,
    /// Where the synthesized raw rows were written, if they were.
    pub sample_path: Option<PathBuf>,
}

/// Result of pass 2.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: AnalysisReport,
    pub report_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub charts: Vec<PathBuf>,
    pub failed_charts: Vec<String>,
}
