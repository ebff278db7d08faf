//! Data cleaning for title tables.
//!
//! This module provides functionality for:
//! - Sanitizing text values (trimming, missing markers)
//! - Normalizing the `type` column
//! - Dropping rows that fail a required-column policy
//! - Filling optional categorical columns with placeholders
//! - Deriving `year_added` / `month_added` from `date_added`
//!
//! Cleaning is idempotent: running it on its own output changes nothing.

mod dates;
mod sanitizers;

pub use dates::{parse_date_added, year_and_month};

use crate::error::{AnalysisError, Result};
use crate::loader::coerce_schema;
use crate::schema::{
    self, ColumnPolicy, DATE_ADDED, MONTH_ADDED, RATING, RELEASE_YEAR, SHOW_ID, TITLE, TYPE,
    TitleType, YEAR_ADDED, canonical_order,
};
use crate::types::{CleaningSummary, ColumnMissing, DropReason};
use crate::utils::{
    column_names, filter_rows, int_series, int_values, set_column, text_series, text_values,
};
use polars::prelude::*;
use sanitizers::sanitize_text_columns;
use tracing::{debug, info};

/// Applies the per-column cleaning policies to a title table.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleCleaner;

impl TitleCleaner {
    /// Clean a title table.
    ///
    /// Steps, in order:
    /// 1. Coerce catalogue types and add absent optional columns
    /// 2. Trim text and turn missing markers into nulls
    /// 3. Normalize `type` labels
    /// 4. Drop rows failing a drop-row policy
    /// 5. Fill placeholder columns
    /// 6. Derive `year_added` / `month_added`
    /// 7. Reorder columns canonically
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        let mut summary = CleaningSummary {
            rows_before: df.height(),
            ..Default::default()
        };

        info!("Cleaning {} rows...", df.height());

        let df = coerce_schema(df)?;
        let (df, sanitized) = sanitize_text_columns(df)?;
        if sanitized > 0 {
            summary
                .actions
                .push(format!("Trimmed or blanked {} text values", sanitized));
        }

        summary.missing_before = missing_counts(&df)?;

        let mut df = df;
        summary.types_normalized = normalize_types(&mut df)?;
        if summary.types_normalized > 0 {
            summary.actions.push(format!(
                "Normalized {} type labels to 'Movie' / 'TV Show'",
                summary.types_normalized
            ));
        }

        let (df, dropped) = drop_invalid_rows(df)?;
        for (reason, count) in &dropped {
            summary.actions.push(format!(
                "Dropped {} rows with {}",
                count,
                reason.description()
            ));
        }
        summary.dropped = dropped;

        let mut df = df;
        summary.filled = fill_placeholders(&mut df)?;
        for fill in &summary.filled {
            if let Some(ColumnPolicy::Fill(placeholder)) =
                schema::column_spec(&fill.column).map(|c| c.policy)
            {
                summary.actions.push(format!(
                    "Filled {} missing '{}' values with '{}'",
                    fill.missing, fill.column, placeholder
                ));
            }
        }

        summary.unparsed_dates = derive_date_fields(&mut df)?;
        if summary.unparsed_dates > 0 {
            summary.actions.push(format!(
                "Left year_added/month_added empty for {} unparseable dates",
                summary.unparsed_dates
            ));
        }

        let ordered: Vec<PlSmallStr> = canonical_order(&column_names(&df))
            .iter()
            .map(|s| s.as_str().into())
            .collect();
        let df = df.select(ordered)?;

        summary.rows_after = df.height();
        if df.height() == 0 {
            return Err(AnalysisError::EmptyDataset("cleaning".to_string()));
        }

        info!(
            "Cleaning complete: {} -> {} rows, {} values filled",
            summary.rows_before,
            summary.rows_after,
            summary.total_filled()
        );
        Ok((df, summary))
    }
}

/// Missing values per catalogue source column, in canonical order.
fn missing_counts(df: &DataFrame) -> Result<Vec<ColumnMissing>> {
    schema::source_columns()
        .map(|spec| {
            let missing = df.column(spec.name)?.null_count();
            Ok(ColumnMissing {
                column: spec.name.to_string(),
                missing,
            })
        })
        .collect()
}

/// Rewrite `type` labels to their canonical spelling; unknown labels become null.
fn normalize_types(df: &mut DataFrame) -> Result<usize> {
    let values = text_values(df, TYPE)?;
    let mut rewritten = 0;
    let normalized: Vec<Option<String>> = values
        .iter()
        .map(|value| {
            let canonical = value
                .as_deref()
                .and_then(TitleType::parse)
                .map(|t| t.as_str().to_string());
            if value.is_some() && canonical.is_some() && canonical != *value {
                rewritten += 1;
            }
            canonical
        })
        .collect();

    if rewritten > 0 {
        debug!("Normalized {} type labels", rewritten);
    }
    set_column(df, text_series(TYPE, normalized))?;
    Ok(rewritten)
}

/// Remove rows whose drop-row columns are missing. Each row is counted under
/// its first failing rule.
fn drop_invalid_rows(df: DataFrame) -> Result<(DataFrame, Vec<(DropReason, usize)>)> {
    let rules: [(&str, DropReason); 5] = [
        (SHOW_ID, DropReason::MissingIdentifier),
        (TYPE, DropReason::InvalidType),
        (TITLE, DropReason::MissingTitle),
        (RELEASE_YEAR, DropReason::InvalidReleaseYear),
        (RATING, DropReason::MissingRating),
    ];

    let masks: Vec<Vec<bool>> = rules
        .iter()
        .map(|(column, _)| -> Result<Vec<bool>> {
            let column = df.column(column)?;
            Ok(column.is_null().into_iter().map(|v| v.unwrap_or(true)).collect())
        })
        .collect::<Result<_>>()?;

    let mut keep = vec![true; df.height()];
    let mut counts = vec![0usize; rules.len()];
    for (row, keep_row) in keep.iter_mut().enumerate() {
        if let Some(rule) = masks.iter().position(|missing| missing[row]) {
            *keep_row = false;
            counts[rule] += 1;
        }
    }

    let dropped: Vec<(DropReason, usize)> = rules
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((_, reason), count)| (*reason, count))
        .collect();

    if dropped.is_empty() {
        return Ok((df, dropped));
    }

    let filtered = filter_rows(&df, &keep)?;
    debug!("Dropped {} rows", df.height() - filtered.height());
    Ok((filtered, dropped))
}

/// Fill every placeholder column, returning per-column fill counts.
fn fill_placeholders(df: &mut DataFrame) -> Result<Vec<ColumnMissing>> {
    let mut filled = Vec::new();

    for spec in schema::source_columns() {
        let ColumnPolicy::Fill(placeholder) = spec.policy else {
            continue;
        };
        let values = text_values(df, spec.name)?;
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing == 0 {
            continue;
        }

        let completed: Vec<Option<String>> = values
            .into_iter()
            .map(|v| Some(v.unwrap_or_else(|| placeholder.to_string())))
            .collect();
        set_column(df, text_series(spec.name, completed))?;
        filled.push(ColumnMissing {
            column: spec.name.to_string(),
            missing,
        });
    }

    Ok(filled)
}

/// Recompute `year_added` / `month_added` from `date_added`.
///
/// Returns the number of non-missing dates that could not be parsed.
fn derive_date_fields(df: &mut DataFrame) -> Result<usize> {
    let dates = text_values(df, DATE_ADDED)?;
    let mut unparsed = 0;
    let mut years = Vec::with_capacity(dates.len());
    let mut months = Vec::with_capacity(dates.len());

    for date in &dates {
        let parts = date.as_deref().and_then(year_and_month);
        if date.is_some() && parts.is_none() {
            unparsed += 1;
        }
        years.push(parts.map(|(year, _)| year));
        months.push(parts.map(|(_, month)| month));
    }

    set_column(df, int_series(YEAR_ADDED, years))?;
    set_column(df, int_series(MONTH_ADDED, months))?;

    let derived = int_values(df, YEAR_ADDED)?.iter().flatten().count();
    debug!("Derived year_added for {} of {} rows", derived, df.height());
    Ok(unparsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn messy_titles() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "show_id".into(),
                &[Some("s1"), Some("s2"), Some("s3"), None, Some("s5"), Some("s6")],
            ),
            Column::new(
                "type".into(),
                &[Some("movie"), Some("TV Show"), Some("Podcast"), Some("Movie"), Some(" Movie "), Some("tv show")],
            ),
            Column::new(
                "title".into(),
                &[Some("Alpha"), Some("Beta"), Some("Gamma"), Some("Delta"), Some("Eps"), Some("Zeta")],
            ),
            Column::new(
                "director".into(),
                &[None, Some("Jane Smith"), None, None, Some("  "), Some("N/A")],
            ),
            Column::new(
                "country".into(),
                &[Some("NA"), None, Some("UK"), Some("UK"), Some("India"), Some("Japan")],
            ),
            Column::new(
                "date_added".into(),
                &[Some("September 25, 2021"), Some("not a date"), None, None, Some("2019-04-01"), None],
            ),
            Column::new(
                "release_year".into(),
                &[Some("2020"), Some("2019"), Some("2018"), Some("2017"), Some("20"), Some("2016")],
            ),
            Column::new(
                "rating".into(),
                &[Some("PG"), Some("TV-MA"), Some("R"), Some("R"), Some("R"), None],
            ),
            Column::new(
                "listed_in".into(),
                &[Some("Dramas, Comedies"), None, Some("Action"), Some("Action"), Some("Action"), Some("Action")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_rules_and_reasons() {
        let (df, summary) = TitleCleaner.clean(messy_titles()).unwrap();

        // s3 invalid type, row 4 missing id, s5 bad year, s6 missing rating
        assert_eq!(df.height(), 2);
        assert_eq!(summary.rows_before, 6);
        assert_eq!(summary.rows_after, 2);
        assert_eq!(
            summary.dropped,
            vec![
                (DropReason::MissingIdentifier, 1),
                (DropReason::InvalidType, 1),
                (DropReason::InvalidReleaseYear, 1),
                (DropReason::MissingRating, 1),
            ]
        );
    }

    #[test]
    fn test_types_normalized() {
        let (df, summary) = TitleCleaner.clean(messy_titles()).unwrap();
        let types = text_values(&df, "type").unwrap();
        assert_eq!(types, vec![Some("Movie".to_string()), Some("TV Show".to_string())]);
        // "movie", " Movie " (after trim: "Movie", not counted), "tv show"
        assert_eq!(summary.types_normalized, 2);
    }

    #[test]
    fn test_placeholders_filled() {
        let (df, summary) = TitleCleaner.clean(messy_titles()).unwrap();

        let directors = text_values(&df, "director").unwrap();
        assert_eq!(directors[0].as_deref(), Some("No Director"));
        assert_eq!(directors[1].as_deref(), Some("Jane Smith"));

        let countries = text_values(&df, "country").unwrap();
        // "NA" is a country code, not a missing marker
        assert_eq!(countries[0].as_deref(), Some("NA"));
        assert_eq!(countries[1].as_deref(), Some("Unknown"));

        let genres = text_values(&df, "listed_in").unwrap();
        assert_eq!(genres[1].as_deref(), Some("Uncategorized"));

        // cast was absent from the input and is filled for both kept rows
        let cast = text_values(&df, "cast").unwrap();
        assert_eq!(cast, vec![Some("Unknown".to_string()), Some("Unknown".to_string())]);
        assert!(summary.total_filled() >= 4);
    }

    #[test]
    fn test_derived_date_fields() {
        let (df, summary) = TitleCleaner.clean(messy_titles()).unwrap();
        assert_eq!(int_values(&df, "year_added").unwrap(), vec![Some(2021), None]);
        assert_eq!(int_values(&df, "month_added").unwrap(), vec![Some(9), None]);
        // "not a date" is kept as-is
        let dates = text_values(&df, "date_added").unwrap();
        assert_eq!(dates[1].as_deref(), Some("not a date"));
        assert_eq!(summary.unparsed_dates, 1);
    }

    #[test]
    fn test_required_columns_non_empty() {
        let (df, _) = TitleCleaner.clean(messy_titles()).unwrap();
        for column in schema::required_columns() {
            assert_eq!(df.column(column).unwrap().null_count(), 0, "column {}", column);
        }
    }

    #[test]
    fn test_canonical_column_order() {
        let (df, _) = TitleCleaner.clean(messy_titles()).unwrap();
        let expected: Vec<&str> = schema::COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(column_names(&df), expected);
    }

    #[test]
    fn test_idempotent() {
        let (once, _) = TitleCleaner.clean(messy_titles()).unwrap();
        let (twice, summary) = TitleCleaner.clean(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
        assert!(summary.is_noop());
        assert!(summary.dropped.is_empty());
    }

    #[test]
    fn test_all_rows_dropped_is_error() {
        let df = DataFrame::new(vec![
            Column::new("show_id".into(), &["s1"]),
            Column::new("type".into(), &["Podcast"]),
            Column::new("title".into(), &["Alpha"]),
            Column::new("release_year".into(), &["2001"]),
            Column::new("rating".into(), &["R"]),
            Column::new("listed_in".into(), &["Dramas"]),
        ])
        .unwrap();

        let err = TitleCleaner.clean(df).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_DATASET");
    }
}
