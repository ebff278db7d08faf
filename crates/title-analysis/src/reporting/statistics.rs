//! Statistics computed over a cleaned title table.

use crate::error::Result;
use crate::schema::{COUNTRY, DURATION, LISTED_IN, RATING, RELEASE_YEAR, TYPE, TitleType, YEAR_ADDED};
use crate::utils::{
    column_names, has_column, int_values, is_numeric_dtype, leading_number, split_list, text_values,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Occurrences of one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Titles added in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// One line of the dataset info block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: String,
}

/// Summary statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDescription {
    Numeric {
        name: String,
        count: usize,
        mean: Option<f64>,
        std: Option<f64>,
        min: Option<f64>,
        q25: Option<f64>,
        median: Option<f64>,
        q75: Option<f64>,
        max: Option<f64>,
    },
    Text {
        name: String,
        count: usize,
        unique: usize,
        top: Option<String>,
        freq: usize,
    },
}

impl ColumnDescription {
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Text { name, .. } => name,
        }
    }
}

/// Headline figures printed after the distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub total: usize,
    pub movie_percentage: f64,
    pub tv_show_percentage: f64,
    /// "N/A" when no rating is present.
    pub most_common_rating: String,
    pub reference_year: i32,
    /// Mean of `reference_year - release_year`.
    pub average_age: Option<f64>,
    pub recent_window_years: i32,
    /// Share of titles released at or after `reference_year - recent_window_years`.
    pub recent_percentage: f64,
}

/// Distribution of one duration unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub median: f64,
    #[serde(skip)]
    pub values: Vec<u32>,
}

impl DurationStats {
    /// Build stats from raw values; `None` when there are none.
    pub fn from_values(mut values: Vec<u32>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_unstable();
        let as_f64: Vec<f64> = values.iter().map(|v| f64::from(*v)).collect();
        Some(Self {
            count: values.len(),
            min: values[0],
            max: values[values.len() - 1],
            mean: as_f64.iter().sum::<f64>() / as_f64.len() as f64,
            median: quantile(&as_f64, 0.5),
            values,
        })
    }
}

/// Movie minutes and TV seasons parsed from `duration`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationAnalysis {
    pub movie_minutes: Option<DurationStats>,
    pub tv_seasons: Option<DurationStats>,
}

impl DurationAnalysis {
    pub fn is_empty(&self) -> bool {
        self.movie_minutes.is_none() && self.tv_seasons.is_none()
    }
}

// =============================================================================
// Counting
// =============================================================================

/// Count labels, ordered by count descending and then by label ascending.
pub fn value_counts<I, S>(labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.into()).or_insert(0) += 1;
    }

    let mut ordered: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    ordered.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ordered
}

/// Count the non-missing values of a text column.
pub fn column_counts(df: &DataFrame, column: &str) -> Result<Vec<CategoryCount>> {
    Ok(value_counts(text_values(df, column)?.into_iter().flatten()))
}

/// Titles per `type`.
pub fn type_counts(df: &DataFrame) -> Result<Vec<CategoryCount>> {
    column_counts(df, TYPE)
}

/// Titles per `rating`.
pub fn rating_counts(df: &DataFrame) -> Result<Vec<CategoryCount>> {
    column_counts(df, RATING)
}

/// The `top_n` most frequent genres, counting every entry of a multi-valued
/// `listed_in` field (a genre repeated within one title counts each time).
pub fn top_genres(df: &DataFrame, top_n: usize) -> Result<Vec<CategoryCount>> {
    let values = text_values(df, LISTED_IN)?;
    let genres = values
        .iter()
        .flatten()
        .flat_map(|listed| split_list(listed).map(str::to_string));
    Ok(value_counts(genres).into_iter().take(top_n).collect())
}

/// The `top_n` most frequent raw `country` values.
pub fn top_countries(df: &DataFrame, top_n: usize) -> Result<Vec<CategoryCount>> {
    Ok(column_counts(df, COUNTRY)?.into_iter().take(top_n).collect())
}

/// Titles added per year, ascending. Empty when no `year_added` is present.
pub fn added_by_year(df: &DataFrame) -> Result<Vec<YearCount>> {
    if !has_column(df, YEAR_ADDED) {
        return Ok(Vec::new());
    }

    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for year in int_values(df, YEAR_ADDED)?.into_iter().flatten() {
        *years.entry(year).or_insert(0) += 1;
    }
    Ok(years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect())
}

// =============================================================================
// Describing
// =============================================================================

/// Non-null count and dtype of every column.
pub fn dataset_info(df: &DataFrame) -> Vec<ColumnInfo> {
    df.get_columns()
        .iter()
        .map(|column| ColumnInfo {
            name: column.name().to_string(),
            non_null: column.len() - column.null_count(),
            dtype: column.dtype().to_string(),
        })
        .collect()
}

/// Summary statistics of every column, in table order.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnDescription>> {
    column_names(df)
        .into_iter()
        .map(|name| {
            if is_numeric_dtype(df.column(&name)?.dtype()) {
                describe_numeric(df, name)
            } else {
                describe_text(df, name)
            }
        })
        .collect()
}

fn describe_numeric(df: &DataFrame, name: String) -> Result<ColumnDescription> {
    let series = df
        .column(&name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let mut values: Vec<f64> = series.f64()?.into_iter().flatten().collect();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|mean| {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });
    let at = |q: f64| (count > 0).then(|| quantile(&values, q));

    Ok(ColumnDescription::Numeric {
        name,
        count,
        mean,
        std,
        min: values.first().copied(),
        q25: at(0.25),
        median: at(0.5),
        q75: at(0.75),
        max: values.last().copied(),
    })
}

fn describe_text(df: &DataFrame, name: String) -> Result<ColumnDescription> {
    let values: Vec<String> = text_values(df, &name)?.into_iter().flatten().collect();
    let count = values.len();
    let unique = values.iter().collect::<HashSet<_>>().len();
    let top = value_counts(values).into_iter().next();

    Ok(ColumnDescription::Text {
        name,
        count,
        unique,
        freq: top.as_ref().map_or(0, |t| t.count),
        top: top.map(|t| t.label),
    })
}

/// Linear-interpolated quantile of sorted values. Panics on empty input.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

// =============================================================================
// Insights
// =============================================================================

/// Type shares, most common rating and content age.
pub fn insights(df: &DataFrame, reference_year: i32, recent_window_years: i32) -> Result<Insights> {
    let total = df.height();
    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };

    let types = type_counts(df)?;
    let count_of = |title_type: TitleType| {
        types
            .iter()
            .find(|c| c.label == title_type.as_str())
            .map_or(0, |c| c.count)
    };

    let most_common_rating = rating_counts(df)?
        .into_iter()
        .next()
        .map_or_else(|| "N/A".to_string(), |c| c.label);

    let release_years: Vec<i32> = int_values(df, RELEASE_YEAR)?.into_iter().flatten().collect();
    let average_age = (!release_years.is_empty()).then(|| {
        release_years
            .iter()
            .map(|year| f64::from(reference_year - year))
            .sum::<f64>()
            / release_years.len() as f64
    });
    let recent = release_years
        .iter()
        .filter(|year| **year >= reference_year - recent_window_years)
        .count();

    Ok(Insights {
        total,
        movie_percentage: share(count_of(TitleType::Movie)),
        tv_show_percentage: share(count_of(TitleType::TvShow)),
        most_common_rating,
        reference_year,
        average_age,
        recent_window_years,
        recent_percentage: share(recent),
    })
}

/// Parse durations: minutes for movies ("90 min"), seasons for TV shows ("2 Seasons").
pub fn duration_analysis(df: &DataFrame) -> Result<DurationAnalysis> {
    let types = text_values(df, TYPE)?;
    let durations = text_values(df, DURATION)?;

    let mut minutes = Vec::new();
    let mut seasons = Vec::new();
    for (title_type, duration) in types.iter().zip(&durations) {
        let (Some(title_type), Some(duration)) = (title_type, duration) else {
            continue;
        };
        match TitleType::parse(title_type) {
            Some(TitleType::Movie) if duration.contains("min") => {
                minutes.extend(leading_number(duration));
            }
            Some(TitleType::TvShow) if duration.contains("Season") => {
                seasons.extend(leading_number(duration));
            }
            _ => {}
        }
    }

    Ok(DurationAnalysis {
        movie_minutes: DurationStats::from_values(minutes),
        tv_seasons: DurationStats::from_values(seasons),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cleaned_titles() -> DataFrame {
        DataFrame::new(vec![
            Column::new("show_id".into(), &["s1", "s2", "s3", "s4", "s5"]),
            Column::new("type".into(), &["Movie", "TV Show", "Movie", "Movie", "TV Show"]),
            Column::new("country".into(), &["USA", "UK", "USA", "Unknown", "UK"]),
            Column::new("release_year".into(), &[2020i32, 2010, 2000, 2021, 2019]),
            Column::new("rating".into(), &["TV-MA", "PG", "TV-MA", "PG", "R"]),
            Column::new(
                "duration".into(),
                &[Some("90 min"), Some("2 Seasons"), Some("120 min"), None, Some("1 Season")],
            ),
            Column::new(
                "listed_in".into(),
                &["Dramas, Comedies", "Comedies", "Action, Dramas", "Dramas", "Kids' TV"],
            ),
            Column::new(
                "year_added".into(),
                &[Some(2021i32), Some(2019), None, Some(2021), Some(2018)],
            ),
        ])
        .unwrap()
    }

    fn labels(counts: &[CategoryCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[test]
    fn test_value_counts_ties_are_lexicographic() {
        let counts = value_counts(["b", "a", "c", "b", "a"]);
        assert_eq!(labels(&counts), vec![("a", 2), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn test_type_and_rating_counts_sum_to_total() {
        let df = cleaned_titles();
        let types = type_counts(&df).unwrap();
        let ratings = rating_counts(&df).unwrap();

        assert_eq!(labels(&types), vec![("Movie", 3), ("TV Show", 2)]);
        assert_eq!(labels(&ratings), vec![("PG", 2), ("TV-MA", 2), ("R", 1)]);
        assert_eq!(types.iter().map(|c| c.count).sum::<usize>(), df.height());
        assert_eq!(ratings.iter().map(|c| c.count).sum::<usize>(), df.height());
    }

    #[test]
    fn test_top_genres_splits_listed_in() {
        let df = cleaned_titles();
        let genres = top_genres(&df, 3).unwrap();
        assert_eq!(labels(&genres), vec![("Dramas", 3), ("Comedies", 2), ("Action", 1)]);
    }

    #[test]
    fn test_top_genres_counts_repeated_entries() {
        let df = DataFrame::new(vec![Column::new(
            "listed_in".into(),
            &[Some("Dramas, Dramas"), Some("Comedies")],
        )])
        .unwrap();
        let genres = top_genres(&df, 10).unwrap();
        assert_eq!(labels(&genres), vec![("Dramas", 2), ("Comedies", 1)]);
    }

    #[test]
    fn test_top_countries_keeps_unknown() {
        let df = cleaned_titles();
        let countries = top_countries(&df, 10).unwrap();
        assert_eq!(labels(&countries), vec![("UK", 2), ("USA", 2), ("Unknown", 1)]);
    }

    #[test]
    fn test_added_by_year_ascending() {
        let df = cleaned_titles();
        let years = added_by_year(&df).unwrap();
        assert_eq!(
            years,
            vec![
                YearCount { year: 2018, count: 1 },
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2021, count: 2 },
            ]
        );
    }

    #[test]
    fn test_describe_numeric_and_text() {
        let df = cleaned_titles();
        let described = describe(&df).unwrap();
        assert_eq!(described.len(), df.width());

        let release = described.iter().find(|d| d.name() == "release_year").unwrap();
        match release {
            ColumnDescription::Numeric { count, mean, min, median, max, q25, .. } => {
                assert_eq!(*count, 5);
                assert_eq!(*mean, Some(2014.0));
                assert_eq!(*min, Some(2000.0));
                assert_eq!(*q25, Some(2010.0));
                assert_eq!(*median, Some(2019.0));
                assert_eq!(*max, Some(2021.0));
            }
            other => panic!("expected numeric description, got {:?}", other),
        }

        let rating = described.iter().find(|d| d.name() == "rating").unwrap();
        assert_eq!(
            rating,
            &ColumnDescription::Text {
                name: "rating".to_string(),
                count: 5,
                unique: 3,
                top: Some("PG".to_string()),
                freq: 2,
            }
        );
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&[7.0], 0.75), 7.0);
    }

    #[test]
    fn test_insights() {
        let df = cleaned_titles();
        let insights = insights(&df, 2024, 5).unwrap();

        assert_eq!(insights.total, 5);
        assert!((insights.movie_percentage - 60.0).abs() < 1e-9);
        assert!((insights.tv_show_percentage - 40.0).abs() < 1e-9);
        assert_eq!(insights.most_common_rating, "PG");
        // ages: 4, 14, 24, 3, 5
        assert_eq!(insights.average_age, Some(10.0));
        // 2020, 2021, 2019 are >= 2019
        assert!((insights.recent_percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_duration_analysis() {
        let df = cleaned_titles();
        let analysis = duration_analysis(&df).unwrap();

        let minutes = analysis.movie_minutes.unwrap();
        assert_eq!(minutes.values, vec![90, 120]);
        assert_eq!(minutes.mean, 105.0);

        let seasons = analysis.tv_seasons.unwrap();
        assert_eq!((seasons.min, seasons.max), (1, 2));
        assert_eq!(seasons.median, 1.5);
    }

    #[test]
    fn test_dataset_info() {
        let info = dataset_info(&cleaned_titles());
        let duration = info.iter().find(|c| c.name == "duration").unwrap();
        assert_eq!(duration.non_null, 4);
        assert_eq!(info[0].name, "show_id");
    }
}
