//! Dataset loading.
//!
//! This module provides:
//! - Reading a title table from a delimited file
//! - Falling back to a seeded synthetic sample when no file exists
//! - Loading the cleaned export for the report pass

mod synthetic;

pub use synthetic::SyntheticGenerator;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::exporter::CsvExporter;
use crate::schema::{self, ColumnKind, RELEASE_YEAR};
use crate::types::{DataSource, LoadedDataset};
use crate::utils::{column_names, has_column, int_series, set_column, text_series, text_values};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads title tables from disk or synthesizes them.
#[derive(Debug, Clone)]
pub struct DataLoader {
    seed: u64,
    sample_size: usize,
    write_sample: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl DataLoader {
    /// Create a loader using the synthesis settings of a configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            seed: config.seed,
            sample_size: config.sample_size,
            write_sample: config.write_sample,
        }
    }

    /// Load the raw dataset for pass 1.
    ///
    /// A path that does not exist falls back to synthetic rows. A path that
    /// exists must parse; header problems are reported as `FileFormat`.
    pub fn load_or_synthesize(&self, path: Option<&Path>) -> Result<LoadedDataset> {
        if let Some(path) = path {
            if path.exists() {
                let data = Self::read_titles(path)?;
                return Ok(LoadedDataset {
                    data,
                    source: DataSource::File {
                        path: path.to_path_buf(),
                    },
                });
            }
            info!("{} not found. Creating a sample dataset...", path.display());
        } else {
            info!("No input file given. Creating a sample dataset...");
        }

        let data = SyntheticGenerator::new(self.seed, self.sample_size).generate()?;
        Ok(LoadedDataset {
            data,
            source: DataSource::Synthetic {
                seed: self.seed,
                rows: self.sample_size,
            },
        })
    }

    /// Persist synthesized rows to `path` so later runs read the same data.
    ///
    /// Returns `None` when writing samples is disabled.
    pub fn persist_sample(&self, dataset: &LoadedDataset, path: &Path) -> Result<Option<PathBuf>> {
        if !self.write_sample || !matches!(dataset.source, DataSource::Synthetic { .. }) {
            return Ok(None);
        }
        let mut data = dataset.data.clone();
        CsvExporter::write_csv(&mut data, path)
            .context(format!("Writing sample dataset to {}", path.display()))?;
        info!(
            "Sample dataset with {} entries created and saved as {}",
            data.height(),
            path.display()
        );
        Ok(Some(path.to_path_buf()))
    }

    /// Load the cleaned export for pass 2.
    pub fn load_cleaned(path: &Path) -> Result<DataFrame> {
        if !path.exists() {
            return Err(AnalysisError::MissingCleanedExport(path.to_path_buf()));
        }
        Self::read_titles(path).context("Loading cleaned export")
    }

    /// Parse a delimited title file into a typed DataFrame.
    ///
    /// Every column is read as text first, then catalogue integer columns are
    /// coerced. Optional catalogue columns that are absent are added empty.
    pub fn read_titles(path: &Path) -> Result<DataFrame> {
        let raw = read_csv_as_text(path)?;
        validate_header(&raw, path)?;

        if raw.height() == 0 {
            return Err(AnalysisError::file_format(path, "header present but no data rows"));
        }

        let df = coerce_schema(raw)?;
        info!(
            "Dataset loaded successfully with {} rows and {} columns",
            df.height(),
            df.width()
        );
        Ok(df)
    }
}

/// Read every column as text, retrying without quote handling.
fn read_csv_as_text(path: &Path) -> Result<DataFrame> {
    // Strategy 1: standard quoted CSV
    let quoted = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish());

    let first_error = match quoted {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
            e
        }
    };

    // Strategy 2: without quote handling
    let unquoted = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish());

    unquoted.map_err(|e| {
        debug!("Loading without quotes failed: {}", e);
        AnalysisError::file_format(path, format!("unparseable header or rows: {}", first_error))
    })
}

/// Check that every header-required catalogue column is present.
fn validate_header(df: &DataFrame, path: &Path) -> Result<()> {
    if df.width() == 0 {
        return Err(AnalysisError::file_format(path, "no header row"));
    }

    let missing: Vec<&str> = schema::COLUMNS
        .iter()
        .filter(|c| c.header_required && !has_column(df, c.name))
        .map(|c| c.name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::file_format(
            path,
            format!("header is missing required columns: {}", missing.join(", ")),
        ))
    }
}

/// Convert text columns to their catalogue types and add absent optional columns.
pub(crate) fn coerce_schema(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;

    for name in column_names(&df) {
        let values = text_values(&df, &name)?;
        match schema::column_spec(&name).map(|c| c.kind) {
            Some(ColumnKind::Integer) => {
                let parse: fn(&str) -> Option<i32> = if name == RELEASE_YEAR {
                    schema::parse_year
                } else {
                    schema::parse_int
                };
                let parsed = values
                    .into_iter()
                    .map(|v| v.as_deref().and_then(parse))
                    .collect();
                set_column(&mut df, int_series(&name, parsed))?;
            }
            _ => {
                if df.column(&name)?.dtype() != &DataType::String {
                    set_column(&mut df, text_series(&name, values))?;
                }
            }
        }
    }

    let height = df.height();
    for spec in schema::source_columns() {
        if has_column(&df, spec.name) {
            continue;
        }
        warn!("Column '{}' absent from input, treating it as all missing", spec.name);
        let series = match spec.kind {
            ColumnKind::Integer => int_series(spec.name, vec![None; height]),
            ColumnKind::Text => text_series(spec.name, vec![None; height]),
        };
        set_column(&mut df, series)?;
    }

    Ok(df)
}
