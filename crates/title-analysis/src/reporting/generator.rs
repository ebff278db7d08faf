use super::statistics::{
    self, CategoryCount, ColumnDescription, ColumnInfo, DurationAnalysis, DurationStats, Insights,
    YearCount,
};
use crate::config::{AnalysisConfig, JSON_REPORT_FILE};
use crate::error::{Result, ResultExt};
use crate::utils::truncate_str;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const LABEL_WIDTH: usize = 28;
const TOP_VALUE_WIDTH: usize = 30;

// ============================================================================
// Report Types
// ============================================================================

/// Everything the report pass computes from the cleaned export.
///
/// The same value is rendered as text and, on request, serialized to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path of the cleaned export that was analyzed
    pub source_file: String,
    /// Shape of the analyzed table
    pub rows: usize,
    pub columns: usize,

    pub dataset_info: Vec<ColumnInfo>,
    pub summary_statistics: Vec<ColumnDescription>,

    pub type_counts: Vec<CategoryCount>,
    pub rating_counts: Vec<CategoryCount>,
    pub top_genres: Vec<CategoryCount>,
    pub top_countries: Vec<CategoryCount>,
    /// Ascending by year; empty when no `year_added` is known
    pub added_by_year: Vec<YearCount>,

    pub durations: DurationAnalysis,
    pub insights: Insights,

    /// Chart files produced alongside this report
    #[serde(default)]
    pub charts: Vec<String>,
}

impl AnalysisReport {
    /// Compute every statistic of the report.
    pub fn build(df: &DataFrame, source_file: &Path, config: &AnalysisConfig) -> Result<Self> {
        let reference_year = config.effective_reference_year();

        Ok(Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source_file: source_file.display().to_string(),
            rows: df.height(),
            columns: df.width(),
            dataset_info: statistics::dataset_info(df),
            summary_statistics: statistics::describe(df)?,
            type_counts: statistics::type_counts(df)?,
            rating_counts: statistics::rating_counts(df)?,
            top_genres: statistics::top_genres(df, config.top_n)?,
            top_countries: statistics::top_countries(df, config.top_n)?,
            added_by_year: statistics::added_by_year(df)?,
            durations: statistics::duration_analysis(df)?,
            insights: statistics::insights(df, reference_year, config.recent_window_years)?,
            charts: Vec::new(),
        })
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Writes the text and JSON renderings of an [`AnalysisReport`].
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the text report to `file_name` inside the output directory.
    pub fn write_text(&self, report: &AnalysisReport, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let report_path = self.output_dir.join(file_name);
        let mut file = File::create(&report_path)
            .context(format!("Creating report file {}", report_path.display()))?;
        file.write_all(render_text(report).as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, report: &AnalysisReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let report_path = self.output_dir.join(JSON_REPORT_FILE);
        let mut file = File::create(&report_path)
            .context(format!("Creating report file {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

// ============================================================================
// Text Rendering
// ============================================================================

/// Render the report as ordered plain text.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=== Title Catalogue Analysis ===".to_string());
    lines.push(format!("Generated at {}", report.generated_at));
    lines.push(String::new());
    lines.push(format!(
        ">>> Cleaned dataset {} loaded with {} rows and {} columns",
        report.source_file, report.rows, report.columns
    ));
    lines.push(String::new());

    lines.push(">>> Dataset Info:".to_string());
    lines.push(format!(" {:>2}  {:<16} {:>14}  {}", "#", "Column", "Non-Null Count", "Dtype"));
    for (i, column) in report.dataset_info.iter().enumerate() {
        lines.push(format!(
            " {:>2}  {:<16} {:>5} non-null  {}",
            i, column.name, column.non_null, column.dtype
        ));
    }
    lines.push(String::new());

    lines.push(">>> Summary Statistics:".to_string());
    lines.extend(render_descriptions(&report.summary_statistics));
    lines.push(String::new());

    push_counts(&mut lines, ">>> Type Distribution (Movie vs TV Show):", &report.type_counts);
    push_counts(&mut lines, ">>> Ratings Distribution:", &report.rating_counts);
    push_counts(
        &mut lines,
        &format!(">>> Top {} Genres:", report.top_genres.len()),
        &report.top_genres,
    );
    push_counts(
        &mut lines,
        &format!(">>> Top {} Countries with most content:", report.top_countries.len()),
        &report.top_countries,
    );

    if !report.added_by_year.is_empty() {
        lines.push(">>> Content added by year:".to_string());
        for year in &report.added_by_year {
            lines.push(format!("{:<LABEL_WIDTH$} {:>6}", year.year, year.count));
        }
        lines.push(String::new());
    }

    lines.push(">>> Duration Analysis:".to_string());
    if report.durations.is_empty() {
        lines.push("No parseable duration values".to_string());
    } else {
        push_duration(&mut lines, "Movie duration (minutes)", report.durations.movie_minutes.as_ref());
        push_duration(&mut lines, "TV show seasons", report.durations.tv_seasons.as_ref());
    }
    lines.push(String::new());

    if !report.charts.is_empty() {
        lines.push(format!(">>> Plots saved: {}", report.charts.join(", ")));
        lines.push(String::new());
    }

    lines.push(">>> Additional Insights:".to_string());
    lines.extend(render_insights(&report.insights));
    lines.push(String::new());
    lines.push("=== Analysis Completed ===".to_string());

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_counts(lines: &mut Vec<String>, heading: &str, counts: &[CategoryCount]) {
    lines.push(heading.to_string());
    for count in counts {
        lines.push(format!(
            "{:<LABEL_WIDTH$} {:>6}",
            truncate_str(&count.label, LABEL_WIDTH),
            count.count
        ));
    }
    lines.push(String::new());
}

fn push_duration(lines: &mut Vec<String>, label: &str, stats: Option<&DurationStats>) {
    match stats {
        Some(s) => lines.push(format!(
            "{}: count {}, min {}, max {}, mean {:.1}, median {:.1}",
            label, s.count, s.min, s.max, s.mean, s.median
        )),
        None => lines.push(format!("{}: no data", label)),
    }
}

fn render_descriptions(descriptions: &[ColumnDescription]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<14} {:>6} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "numeric", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )];
    for description in descriptions {
        if let ColumnDescription::Numeric {
            name,
            count,
            mean,
            std,
            min,
            q25,
            median,
            q75,
            max,
        } = description
        {
            lines.push(format!(
                "{:<14} {:>6} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
                name,
                count,
                fmt_stat(*mean, 2),
                fmt_stat(*std, 2),
                fmt_stat(*min, 0),
                fmt_stat(*q25, 1),
                fmt_stat(*median, 1),
                fmt_stat(*q75, 1),
                fmt_stat(*max, 0),
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<14} {:>6} {:>7}  {:<TOP_VALUE_WIDTH$} {:>5}",
        "text", "count", "unique", "top", "freq"
    ));
    for description in descriptions {
        if let ColumnDescription::Text {
            name,
            count,
            unique,
            top,
            freq,
        } = description
        {
            lines.push(format!(
                "{:<14} {:>6} {:>7}  {:<TOP_VALUE_WIDTH$} {:>5}",
                name,
                count,
                unique,
                truncate_str(top.as_deref().unwrap_or("NaN"), TOP_VALUE_WIDTH),
                freq
            ));
        }
    }
    lines
}

fn render_insights(insights: &Insights) -> Vec<String> {
    let mut lines = vec![
        format!(
            ">>> Movies represent {:.1}% of content, TV Shows {:.1}%",
            insights.movie_percentage, insights.tv_show_percentage
        ),
        format!(">>> Most common rating: {}", insights.most_common_rating),
    ];
    if let Some(age) = insights.average_age {
        lines.push(format!(">>> Average content age: {:.1} years", age));
    }
    lines.push(format!(
        ">>> {:.1}% of content is from the last {} years",
        insights.recent_percentage, insights.recent_window_years
    ));
    lines
}

fn fmt_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "NaN".to_string(),
    }
}
