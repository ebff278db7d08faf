//! Calendar fields derived from `date_added`.

use chrono::{Datelike, NaiveDate};

/// Accepted `date_added` layouts, tried in order.
const DATE_FORMATS: [&str; 5] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%d %B %Y", "%m/%d/%Y"];

/// Parse a `date_added` string. Returns `None` for anything unrecognized.
pub fn parse_date_added(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Year and month (1-12) of a `date_added` string.
pub fn year_and_month(value: &str) -> Option<(i32, i32)> {
    parse_date_added(value).map(|date| (date.year(), date.month() as i32))
}
