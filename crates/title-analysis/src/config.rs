//! Configuration for the prepare and report passes.
//!
//! This module provides configuration options using the builder pattern.
//! Both binaries translate their CLI flags into one [`AnalysisConfig`].

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default raw dataset location, read by pass 1 when it exists.
pub const DEFAULT_INPUT_FILE: &str = "Netflix_shows_movies.csv";
/// Default name of the cleaned export handed from pass 1 to pass 2.
pub const DEFAULT_CLEANED_FILE: &str = "Netflix_shows_movies_cleaned.csv";
/// Default name of the plain-text report written by pass 2.
pub const DEFAULT_REPORT_FILE: &str = "analysis_output.txt";
/// Name of the optional JSON report written next to the text report.
pub const JSON_REPORT_FILE: &str = "analysis_report.json";

const MIN_CHART_WIDTH: u32 = 200;
const MIN_CHART_HEIGHT: u32 = 150;

/// Configuration shared by both analysis passes.
///
/// Use [`AnalysisConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use title_analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .output_dir("out")
///     .seed(7)
///     .top_n(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Raw dataset path. When the file is missing, synthetic rows are used.
    /// Default: "Netflix_shows_movies.csv"
    pub input_path: PathBuf,

    /// Directory receiving the cleaned export, the reports and the charts.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// File name of the cleaned export inside `output_dir`.
    /// Default: "Netflix_shows_movies_cleaned.csv"
    pub cleaned_file_name: String,

    /// File name of the text report inside `output_dir`.
    /// Default: "analysis_output.txt"
    pub report_file_name: String,

    /// Seed for synthetic data generation.
    /// Default: 42
    pub seed: u64,

    /// Number of synthetic rows to generate.
    /// Default: 100
    pub sample_size: usize,

    /// Write synthesized rows to `input_path` so later runs read them back.
    /// Default: true
    pub write_sample: bool,

    /// Length of the genre and country rankings.
    /// Default: 10
    pub top_n: usize,

    /// Year used for content age. `None` means the current calendar year.
    /// Default: None
    pub reference_year: Option<i32>,

    /// Window, in years, for the "recent content" share.
    /// Default: 5
    pub recent_window_years: i32,

    /// Whether pass 2 renders PNG charts.
    /// Default: true
    pub generate_charts: bool,

    /// Whether pass 2 also writes the JSON report.
    /// Default: false
    pub emit_json: bool,

    /// Chart width in pixels.
    /// Default: 1000
    pub chart_width: u32,

    /// Chart height in pixels.
    /// Default: 600
    pub chart_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            output_dir: PathBuf::from("output"),
            cleaned_file_name: DEFAULT_CLEANED_FILE.to_string(),
            report_file_name: DEFAULT_REPORT_FILE.to_string(),
            seed: 42,
            sample_size: 100,
            write_sample: true,
            top_n: 10,
            reference_year: None,
            recent_window_years: 5,
            generate_charts: true,
            emit_json: false,
            chart_width: 1000,
            chart_height: 600,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Full path of the cleaned export.
    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(&self.cleaned_file_name)
    }

    /// Full path of the text report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }

    /// Raw input path as a `Path`.
    pub fn input(&self) -> &Path {
        &self.input_path
    }

    /// Reference year for age computations, falling back to the current year.
    pub fn effective_reference_year(&self) -> i32 {
        use chrono::Datelike;
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.sample_size == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "sample_size".to_string(),
                value: self.sample_size,
            });
        }

        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "top_n".to_string(),
                value: self.top_n,
            });
        }

        if self.recent_window_years < 1 {
            return Err(ConfigValidationError::InvalidWindow(self.recent_window_years));
        }

        if self.chart_width < MIN_CHART_WIDTH || self.chart_height < MIN_CHART_HEIGHT {
            return Err(ConfigValidationError::ChartTooSmall {
                width: self.chart_width,
                height: self.chart_height,
            });
        }

        for (field, value) in [
            ("cleaned_file_name", &self.cleaned_file_name),
            ("report_file_name", &self.report_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFileName(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid recent window: {0} years (must be at least 1)")]
    InvalidWindow(i32),

    #[error("Chart size {width}x{height} is too small (minimum 200x150)")]
    ChartTooSmall { width: u32, height: u32 },

    #[error("File name '{0}' must not be empty")]
    EmptyFileName(String),
}

impl From<ConfigValidationError> for AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    cleaned_file_name: Option<String>,
    report_file_name: Option<String>,
    seed: Option<u64>,
    sample_size: Option<usize>,
    write_sample: Option<bool>,
    top_n: Option<usize>,
    reference_year: Option<i32>,
    recent_window_years: Option<i32>,
    generate_charts: Option<bool>,
    emit_json: Option<bool>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
}

impl AnalysisConfigBuilder {
    /// Set the raw dataset path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output directory for the export, reports and charts.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the cleaned export file name.
    pub fn cleaned_file_name(mut self, name: impl Into<String>) -> Self {
        self.cleaned_file_name = Some(name.into());
        self
    }

    /// Set the text report file name.
    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.report_file_name = Some(name.into());
        self
    }

    /// Set the seed used for synthetic rows.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of synthetic rows.
    pub fn sample_size(mut self, rows: usize) -> Self {
        self.sample_size = Some(rows);
        self
    }

    /// Enable or disable writing synthesized rows to the input path.
    pub fn write_sample(mut self, write: bool) -> Self {
        self.write_sample = Some(write);
        self
    }

    /// Set the ranking length for genres and countries.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Pin the reference year used for content age.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Set the recent content window in years.
    pub fn recent_window_years(mut self, years: i32) -> Self {
        self.recent_window_years = Some(years);
        self
    }

    /// Enable or disable chart rendering.
    pub fn generate_charts(mut self, generate: bool) -> Self {
        self.generate_charts = Some(generate);
        self
    }

    /// Enable or disable the JSON report.
    pub fn emit_json(mut self, emit: bool) -> Self {
        self.emit_json = Some(emit);
        self
    }

    /// Set the chart dimensions in pixels.
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            cleaned_file_name: self.cleaned_file_name.unwrap_or(defaults.cleaned_file_name),
            report_file_name: self.report_file_name.unwrap_or(defaults.report_file_name),
            seed: self.seed.unwrap_or(defaults.seed),
            sample_size: self.sample_size.unwrap_or(defaults.sample_size),
            write_sample: self.write_sample.unwrap_or(defaults.write_sample),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            reference_year: self.reference_year.or(defaults.reference_year),
            recent_window_years: self
                .recent_window_years
                .unwrap_or(defaults.recent_window_years),
            generate_charts: self.generate_charts.unwrap_or(defaults.generate_charts),
            emit_json: self.emit_json.unwrap_or(defaults.emit_json),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
        };

        config.validate()?;
        Ok(config)
    }
}
