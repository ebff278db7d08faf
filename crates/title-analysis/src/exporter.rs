//! Writes title tables to delimited files.
//!
//! The cleaned export is the hand-off between the two passes, so its column
//! order is fixed: catalogue columns, extra columns, then derived columns.

use crate::error::{AnalysisError, Result, ResultExt};
use crate::schema::canonical_order;
use crate::utils::column_names;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serializes DataFrames to comma-separated files.
pub struct CsvExporter;

impl CsvExporter {
    /// Write the cleaned table to `path` in canonical column order.
    ///
    /// Any failure is returned to the caller; the binaries treat it as fatal.
    pub fn export_cleaned(df: &DataFrame, path: &Path) -> Result<PathBuf> {
        let ordered: Vec<PlSmallStr> = canonical_order(&column_names(df))
            .iter()
            .map(|s| s.as_str().into())
            .collect();
        let mut ordered_df = df.select(ordered)?;

        Self::write_csv(&mut ordered_df, path)
            .context(format!("Writing cleaned export to {}", path.display()))?;

        info!(
            "Cleaned dataset saved: {} ({} rows x {} columns)",
            path.display(),
            ordered_df.height(),
            ordered_df.width()
        );
        Ok(path.to_path_buf())
    }

    /// Write any DataFrame as CSV with a header row, creating parent directories.
    pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(df)
            .map_err(AnalysisError::from)?;

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_reorders_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cleaned.csv");
        let df = DataFrame::new(vec![
            Column::new("title".into(), &["Alpha"]),
            Column::new("year_added".into(), &[2020i32]),
            Column::new("show_id".into(), &["s1"]),
        ])
        .unwrap();

        CsvExporter::export_cleaned(&df, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, "show_id,title,year_added");
        assert!(content.contains("s1,Alpha,2020"));
    }

    #[test]
    fn test_export_quotes_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let df = DataFrame::new(vec![
            Column::new("show_id".into(), &["s1"]),
            Column::new("listed_in".into(), &["Dramas, Comedies"]),
        ])
        .unwrap();

        CsvExporter::export_cleaned(&df, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Dramas, Comedies\""));
    }

    #[test]
    fn test_export_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file cannot be used as a parent directory
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let df = DataFrame::new(vec![Column::new("show_id".into(), &["s1"])]).unwrap();

        let result = CsvExporter::export_cleaned(&df, &blocker.join("cleaned.csv"));
        assert!(result.is_err());
    }
}
