//! Custom error types for the title analysis passes.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! loader, cleaner, exporter and reporter.
//!
//! Errors serialize as `{ code, message }` so they can be embedded in the
//! JSON report or handed to another tool.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the analysis library.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input file has no usable header or is otherwise not a title table.
    #[error("Invalid file format in '{path}': {reason}")]
    FileFormat { path: PathBuf, reason: String },

    /// The second pass could not find the cleaned export written by the first.
    #[error("Cleaned export not found at '{0}' (run title-prepare first)")]
    MissingCleanedExport(PathBuf),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cleaning removed every row.
    #[error("Dataset is empty after {0}")]
    EmptyDataset(String),

    /// Chart rendering failed.
    #[error("Failed to render chart '{chart}': {reason}")]
    Chart { chart: String, reason: String },

    /// Internal error (e.g., a sampling distribution could not be built).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Build a [`AnalysisError::FileFormat`] for `path`.
    pub fn file_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AnalysisError::FileFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`AnalysisError::Chart`] from any displayable backend error.
    pub fn chart(chart: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AnalysisError::Chart {
            chart: chart.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, preserved through context wrapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileFormat { .. } => "FILE_FORMAT",
            Self::MissingCleanedExport(_) => "MISSING_CLEANED_EXPORT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::Chart { .. } => "CHART_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check whether this is a file format error, looking through context.
    pub fn is_file_format(&self) -> bool {
        match self {
            Self::FileFormat { .. } => true,
            Self::WithContext { source, .. } => source.is_file_format(),
            _ => false,
        }
    }
}

impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}
