//! Column catalogue for title records.
//!
//! Defines the canonical column order, the per-column cleaning policy and
//! the value parsers shared by the loader and the cleaner.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SHOW_ID: &str = "show_id";
pub const TYPE: &str = "type";
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";
pub const CAST: &str = "cast";
pub const COUNTRY: &str = "country";
pub const DATE_ADDED: &str = "date_added";
pub const RELEASE_YEAR: &str = "release_year";
pub const RATING: &str = "rating";
pub const DURATION: &str = "duration";
pub const LISTED_IN: &str = "listed_in";
pub const DESCRIPTION: &str = "description";
pub const YEAR_ADDED: &str = "year_added";
pub const MONTH_ADDED: &str = "month_added";

/// Separator between genres in `listed_in` (and between names in `cast`).
pub const LIST_SEPARATOR: &str = ", ";

// 4-digit year, optionally written as a float ("2019.0") by other tools
static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(?:\.0+)?$").expect("Invalid regex: year"));

/// Markers that count as a missing value in text columns.
pub const MISSING_MARKERS: [&str; 5] = ["n/a", "null", "none", "nan", "#n/a"];

/// How the cleaner treats a missing value in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPolicy {
    /// The row is removed when the value is missing or invalid.
    DropRow,
    /// The missing value is replaced by a constant placeholder.
    Fill(&'static str),
    /// The value stays missing; aggregations skip it.
    Keep,
    /// Computed by the cleaner from another column.
    Derived,
}

impl ColumnPolicy {
    /// Columns that must be non-empty after cleaning.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::DropRow | Self::Fill(_))
    }
}

/// Storage type of a column once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
}

/// One entry in the column catalogue.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub policy: ColumnPolicy,
    /// Must be present in an input file header.
    pub header_required: bool,
}

const fn spec(
    name: &'static str,
    kind: ColumnKind,
    policy: ColumnPolicy,
    header_required: bool,
) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        policy,
        header_required,
    }
}

/// Canonical column order of a cleaned title table.
pub const COLUMNS: [ColumnSpec; 14] = [
    spec(SHOW_ID, ColumnKind::Text, ColumnPolicy::DropRow, true),
    spec(TYPE, ColumnKind::Text, ColumnPolicy::DropRow, true),
    spec(TITLE, ColumnKind::Text, ColumnPolicy::DropRow, true),
    spec(DIRECTOR, ColumnKind::Text, ColumnPolicy::Fill("No Director"), false),
    spec(CAST, ColumnKind::Text, ColumnPolicy::Fill("Unknown"), false),
    spec(COUNTRY, ColumnKind::Text, ColumnPolicy::Fill("Unknown"), false),
    spec(DATE_ADDED, ColumnKind::Text, ColumnPolicy::Keep, false),
    spec(RELEASE_YEAR, ColumnKind::Integer, ColumnPolicy::DropRow, true),
    spec(RATING, ColumnKind::Text, ColumnPolicy::DropRow, true),
    spec(DURATION, ColumnKind::Text, ColumnPolicy::Keep, false),
    spec(LISTED_IN, ColumnKind::Text, ColumnPolicy::Fill("Uncategorized"), true),
    spec(DESCRIPTION, ColumnKind::Text, ColumnPolicy::Keep, false),
    spec(YEAR_ADDED, ColumnKind::Integer, ColumnPolicy::Derived, false),
    spec(MONTH_ADDED, ColumnKind::Integer, ColumnPolicy::Derived, false),
];

/// Look up a column in the catalogue.
pub fn column_spec(name: &str) -> Option<&'static ColumnSpec> {
    COLUMNS.iter().find(|c| c.name == name)
}

/// Source columns (everything except derived fields), in canonical order.
pub fn source_columns() -> impl Iterator<Item = &'static ColumnSpec> {
    COLUMNS
        .iter()
        .filter(|c| c.policy != ColumnPolicy::Derived)
}

/// Names of the columns that must be non-empty after cleaning.
pub fn required_columns() -> Vec<&'static str> {
    COLUMNS
        .iter()
        .filter(|c| c.policy.is_required())
        .map(|c| c.name)
        .collect()
}

/// Names of the derived columns.
pub fn derived_columns() -> [&'static str; 2] {
    [YEAR_ADDED, MONTH_ADDED]
}

/// Order a set of column names: catalogue source columns first, then
/// unknown extra columns as given, then derived columns.
pub fn canonical_order(names: &[String]) -> Vec<String> {
    let present = |name: &str| names.iter().any(|n| n == name);
    let mut ordered: Vec<String> = source_columns()
        .filter(|c| present(c.name))
        .map(|c| c.name.to_string())
        .collect();
    ordered.extend(
        names
            .iter()
            .filter(|n| column_spec(n).is_none())
            .cloned(),
    );
    ordered.extend(
        derived_columns()
            .into_iter()
            .filter(|name| present(name))
            .map(str::to_string),
    );
    ordered
}

/// The two categorical values of `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleType {
    Movie,
    TvShow,
}

impl TitleType {
    pub const ALL: [TitleType; 2] = [TitleType::Movie, TitleType::TvShow];

    /// Canonical label as stored in the table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
        }
    }

    /// Parse a type label, tolerating case and separator variations.
    pub fn parse(value: &str) -> Option<Self> {
        let squashed: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match squashed.as_str() {
            "movie" => Some(Self::Movie),
            "tvshow" => Some(Self::TvShow),
            _ => None,
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a raw text value counts as missing.
pub fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Normalize a raw text value: trimmed, or `None` when it is a missing marker.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !is_missing_marker(v) => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Parse a 4-digit release year. Anything else is treated as missing.
pub fn parse_year(value: &str) -> Option<i32> {
    YEAR_PATTERN
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Parse a small integer (derived month/year fields).
pub fn parse_int(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    trimmed
        .parse::<i32>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_starts_with_identifier() {
        assert_eq!(COLUMNS[0].name, SHOW_ID);
        assert_eq!(COLUMNS[12].name, YEAR_ADDED);
        assert_eq!(COLUMNS[13].name, MONTH_ADDED);
        assert_eq!(source_columns().count(), 12);
    }

    #[test]
    fn test_required_columns() {
        let required = required_columns();
        assert!(required.contains(&DIRECTOR));
        assert!(required.contains(&RATING));
        assert!(!required.contains(&DATE_ADDED));
        assert!(!required.contains(&YEAR_ADDED));
    }

    #[test]
    fn test_canonical_order_moves_extras_before_derived() {
        let names: Vec<String> = ["year_added", "title", "source_url", "show_id", "type"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            canonical_order(&names),
            vec!["show_id", "type", "title", "source_url", "year_added"]
        );
    }

    #[test]
    fn test_title_type_parse() {
        assert_eq!(TitleType::parse("Movie"), Some(TitleType::Movie));
        assert_eq!(TitleType::parse(" movie "), Some(TitleType::Movie));
        assert_eq!(TitleType::parse("TV Show"), Some(TitleType::TvShow));
        assert_eq!(TitleType::parse("tv-show"), Some(TitleType::TvShow));
        assert_eq!(TitleType::parse("Podcast"), None);
        assert_eq!(TitleType::TvShow.to_string(), "TV Show");
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing_marker(""));
        assert!(is_missing_marker("   "));
        assert!(is_missing_marker("N/A"));
        assert!(is_missing_marker("null"));
        assert!(!is_missing_marker("Unknown"));
        assert!(!is_missing_marker("Nancy"));
        // country code for Namibia
        assert!(!is_missing_marker("NA"));
        assert_eq!(normalize_text(Some("  Dramas ")), Some("Dramas".to_string()));
        assert_eq!(normalize_text(Some("NaN")), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year(" 2019.0 "), Some(2019));
        assert_eq!(parse_year("19"), None);
        assert_eq!(parse_year("20190"), None);
        assert_eq!(parse_year("soon"), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("9"), Some(9));
        assert_eq!(parse_int("12.0"), Some(12));
        assert_eq!(parse_int("12.5"), None);
        assert_eq!(parse_int(""), None);
    }
}
