//! Text sanitization applied before any policy runs.

use crate::error::Result;
use crate::schema::normalize_text;
use crate::utils::{column_names, set_column, text_series, text_values};
use polars::prelude::*;
use tracing::debug;

/// Trim every text column and turn missing markers into nulls.
///
/// Returns the cleaned DataFrame and the number of values that changed.
pub(crate) fn sanitize_text_columns(df: DataFrame) -> Result<(DataFrame, usize)> {
    let mut df = df;
    let mut changed = 0;

    for name in column_names(&df) {
        if df.column(&name)?.dtype() != &DataType::String {
            continue;
        }

        let values = text_values(&df, &name)?;
        let mut column_changed = 0;
        let cleaned: Vec<Option<String>> = values
            .iter()
            .map(|value| {
                let normalized = normalize_text(value.as_deref());
                if normalized != *value {
                    column_changed += 1;
                }
                normalized
            })
            .collect();

        if column_changed > 0 {
            debug!("Sanitized {} values in '{}'", column_changed, name);
            set_column(&mut df, text_series(&name, cleaned))?;
            changed += column_changed;
        }
    }

    Ok((df, changed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_trims_and_nulls_markers() {
        let df = DataFrame::new(vec![
            Column::new("country".into(), &[Some(" USA "), Some("N/A"), Some(""), None]),
            Column::new("release_year".into(), &[Some(2001i32), None, Some(2003), Some(2004)]),
        ])
        .unwrap();

        let (df, changed) = sanitize_text_columns(df).unwrap();
        assert_eq!(changed, 3);

        let countries = text_values(&df, "country").unwrap();
        assert_eq!(countries, vec![Some("USA".to_string()), None, None, None]);
        // integer columns are untouched
        assert_eq!(df.column("release_year").unwrap().null_count(), 1);
    }

    #[test]
    fn test_sanitize_keeps_unknown_as_value() {
        let df = DataFrame::new(vec![Column::new("country".into(), &["Unknown"])]).unwrap();
        let (df, changed) = sanitize_text_columns(df).unwrap();
        assert_eq!(changed, 0);
        assert_eq!(text_values(&df, "country").unwrap()[0].as_deref(), Some("Unknown"));
    }
}
