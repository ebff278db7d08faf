//! Shared column helpers.
//!
//! Small conversions between polars columns and plain Rust vectors used by
//! the loader, the cleaner and the statistics code.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;

// =============================================================================
// Reading Columns
// =============================================================================

/// Column names of a DataFrame as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Check whether a DataFrame has a column.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names()
        .into_iter()
        .any(|c| c.as_str() == name)
}

/// Read a column as optional strings, casting non-text columns to text.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series();
    let series = if series.dtype() == &DataType::String {
        series.clone()
    } else {
        series.cast(&DataType::String)?
    };
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Read an integer column as optional `i32` values.
pub fn int_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Int32)?;
    Ok(series.i32()?.into_iter().collect())
}

/// Check if a dtype is an integer or float type.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Building Columns
// =============================================================================

/// Build a text Series from optional strings.
pub fn text_series(name: &str, values: Vec<Option<String>>) -> Series {
    Series::new(name.into(), values)
}

/// Build an `Int32` Series from optional values.
pub fn int_series(name: &str, values: Vec<Option<i32>>) -> Series {
    Series::new(name.into(), values)
}

/// Replace an existing column or append a new one.
pub fn set_column(df: &mut DataFrame, series: Series) -> Result<()> {
    let name = series.name().to_string();
    if has_column(df, &name) {
        df.replace(&name, series)?;
    } else {
        df.with_column(series)?;
    }
    Ok(())
}

/// Keep only the rows whose flag is `true`.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

// =============================================================================
// Text Helpers
// =============================================================================

/// Split a multi-valued text field ("Dramas, Comedies") into trimmed parts.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Extract the digits of a text value as a number ("90 min" -> 90).
pub fn leading_number(value: &str) -> Option<u32> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Truncate a string to max length with ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("name".into(), &[Some("a"), None, Some("c")]),
            Column::new("year".into(), &[Some(2001i32), Some(2002), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_text_values_with_nulls() {
        let df = sample_df();
        let values = text_values(&df, "name").unwrap();
        assert_eq!(values, vec![Some("a".to_string()), None, Some("c".to_string())]);
    }

    #[test]
    fn test_text_values_casts_integers() {
        let df = sample_df();
        let values = text_values(&df, "year").unwrap();
        assert_eq!(values[0].as_deref(), Some("2001"));
        assert_eq!(values[2], None);
    }

    #[test]
    fn test_missing_column() {
        let df = sample_df();
        let err = text_values(&df, "rating").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_set_column_replace_and_append() {
        let mut df = sample_df();
        set_column(&mut df, int_series("year", vec![Some(1), Some(2), Some(3)])).unwrap();
        set_column(&mut df, text_series("extra", vec![None, None, None])).unwrap();
        assert_eq!(int_values(&df, "year").unwrap(), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(column_names(&df), vec!["name", "year", "extra"]);
    }

    #[test]
    fn test_filter_rows() {
        let df = sample_df();
        let filtered = filter_rows(&df, &[true, false, true]).unwrap();
        assert_eq!(filtered.height(), 2);
        assert_eq!(filtered.column("name").unwrap().null_count(), 0);
    }

    #[test]
    fn test_split_list() {
        let parts: Vec<&str> = split_list("Dramas, International Movies,  ,Comedies").collect();
        assert_eq!(parts, vec!["Dramas", "International Movies", "Comedies"]);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("90 min"), Some(90));
        assert_eq!(leading_number("3 Seasons"), Some(3));
        assert_eq!(leading_number("Seasons"), None);
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("International Movies", 10), "Interna...");
    }
}
