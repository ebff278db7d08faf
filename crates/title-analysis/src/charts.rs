//! PNG charts for the report pass.
//!
//! Every chart is rendered independently. A chart that fails is logged and
//! reported back to the caller; the others are still drawn.

use crate::error::AnalysisError;
use crate::reporting::{AnalysisReport, CategoryCount, DurationStats, YearCount};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TYPE_DISTRIBUTION: &str = "type_distribution.png";
pub const RATINGS_DISTRIBUTION: &str = "ratings_distribution.png";
pub const TOP_GENRES: &str = "top_genres.png";
pub const CONTENT_BY_YEAR: &str = "content_added_by_year.png";
pub const DURATION_ANALYSIS: &str = "duration_analysis.png";

const BRAND_RED: RGBColor = RGBColor(229, 9, 20);
const BRAND_DARK: RGBColor = RGBColor(34, 31, 31);
const FONT: &str = "sans-serif";

const MOVIE_MINUTE_BINS: usize = 20;
const TV_SEASON_BINS: usize = 10;

type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Charts written by one rendering run.
#[derive(Debug, Clone, Default)]
pub struct ChartOutcome {
    pub written: Vec<PathBuf>,
    /// File names of charts that failed to render.
    pub failed: Vec<String>,
}

/// One histogram bar over `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Renders report charts into an output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            width,
            height,
        }
    }

    /// Render every chart the report has data for.
    pub fn render_all(&self, report: &AnalysisReport) -> ChartOutcome {
        info!("Generating plots...");
        let mut outcome = ChartOutcome::default();

        self.record(&mut outcome, TYPE_DISTRIBUTION, |path| {
            self.vertical_bars(
                path,
                "Distribution of Movies vs TV Shows",
                ("Content Type", "Count"),
                &report.type_counts,
            )
        });
        self.record(&mut outcome, RATINGS_DISTRIBUTION, |path| {
            self.horizontal_bars(
                path,
                "Distribution of Ratings",
                ("Count", "Rating"),
                &report.rating_counts,
            )
        });
        self.record(&mut outcome, TOP_GENRES, |path| {
            self.horizontal_bars(
                path,
                &format!("Top {} Genres", report.top_genres.len()),
                ("Count", "Genre"),
                &report.top_genres,
            )
        });
        if !report.added_by_year.is_empty() {
            self.record(&mut outcome, CONTENT_BY_YEAR, |path| {
                self.year_line(path, &report.added_by_year)
            });
        }
        self.record(&mut outcome, DURATION_ANALYSIS, |path| {
            self.duration_panels(
                path,
                report.durations.movie_minutes.as_ref(),
                report.durations.tv_seasons.as_ref(),
            )
        });

        info!(
            "Plots saved: {}",
            outcome
                .written
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ")
        );
        outcome
    }

    fn record<F>(&self, outcome: &mut ChartOutcome, name: &str, draw: F)
    where
        F: FnOnce(&Path) -> DrawResult,
    {
        let path = self.output_dir.join(name);
        match draw(&path).map_err(|e| AnalysisError::chart(name, e)) {
            Ok(()) => {
                debug!("Chart written: {}", path.display());
                outcome.written.push(path);
            }
            Err(e) => {
                warn!("{}", e);
                outcome.failed.push(name.to_string());
            }
        }
    }

    fn vertical_bars(
        &self,
        path: &Path,
        title: &str,
        (x_desc, y_desc): (&str, &str),
        counts: &[CategoryCount],
    ) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = counts.len() as u32;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n.max(1)).into_segmented(), 0u32..axis_max(counts))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(counts.len().max(1))
            .x_label_formatter(&|v| segment_label(v, counts, false))
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BRAND_RED.filled())
                .margin(20)
                .data(counts.iter().enumerate().map(|(i, c)| (i as u32, c.count as u32))),
        )?;

        root.present()?;
        Ok(())
    }

    /// Horizontal bars with the first entry at the top.
    fn horizontal_bars(
        &self,
        path: &Path,
        title: &str,
        (x_desc, y_desc): (&str, &str),
        counts: &[CategoryCount],
    ) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = counts.len() as u32;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(160)
            .build_cartesian_2d(0u32..axis_max(counts), (0u32..n.max(1)).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(counts.len().max(1))
            .y_label_formatter(&|v| segment_label(v, counts, true))
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        chart.draw_series(
            Histogram::horizontal(&chart)
                .style(BRAND_RED.filled())
                .margin(6)
                .data(
                    counts
                        .iter()
                        .enumerate()
                        .map(|(i, c)| (n - 1 - i as u32, c.count as u32)),
                ),
        )?;

        root.present()?;
        Ok(())
    }

    fn year_line(&self, path: &Path, years: &[YearCount]) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let first = years.first().map_or(0, |y| y.year);
        let last = years.last().map_or(0, |y| y.year);
        let peak = years.iter().map(|y| y.count).max().unwrap_or(0) as u32;

        let mut chart = ChartBuilder::on(&root)
            .caption("Content Added by Year", (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(first..last + 1, 0u32..padded(peak))?;

        chart
            .configure_mesh()
            .light_line_style(BLACK.mix(0.05))
            .x_desc("Year")
            .y_desc("Number of Titles Added")
            .draw()?;

        let points: Vec<(i32, u32)> = years.iter().map(|y| (y.year, y.count as u32)).collect();
        chart.draw_series(LineSeries::new(points.iter().copied(), BRAND_RED.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, BRAND_RED.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    /// Movie minutes on the left, TV seasons on the right.
    fn duration_panels(
        &self,
        path: &Path,
        minutes: Option<&DurationStats>,
        seasons: Option<&DurationStats>,
    ) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let panels = root.split_evenly((1, 2));
        if let Some(stats) = minutes {
            histogram_panel(
                &panels[0],
                "Movie Duration (minutes)",
                "Duration (min)",
                &histogram_bins(&stats.values, MOVIE_MINUTE_BINS),
                BRAND_RED,
            )?;
        }
        if let Some(stats) = seasons {
            histogram_panel(
                &panels[1],
                "TV Show Seasons",
                "Number of Seasons",
                &histogram_bins(&stats.values, TV_SEASON_BINS),
                BRAND_DARK,
            )?;
        }

        root.present()?;
        Ok(())
    }
}

fn histogram_panel(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    title: &str,
    x_desc: &str,
    bins: &[Bin],
    color: RGBColor,
) -> DrawResult {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0) as u32;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first.start..last.end, 0u32..padded(peak))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0), (bin.end, bin.count as u32)],
            color.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}

/// Axis label for a segmented category axis.
fn segment_label(value: &SegmentValue<u32>, counts: &[CategoryCount], reversed: bool) -> String {
    let SegmentValue::CenterOf(index) = value else {
        return String::new();
    };
    let index = *index as usize;
    let index = if reversed {
        counts.len().checked_sub(index + 1)
    } else {
        Some(index)
    };
    index
        .and_then(|i| counts.get(i))
        .map(|c| c.label.clone())
        .unwrap_or_default()
}

/// Upper bound of a count axis with some headroom above the largest bar.
pub fn axis_max(counts: &[CategoryCount]) -> u32 {
    padded(counts.iter().map(|c| c.count).max().unwrap_or(0) as u32)
}

fn padded(peak: u32) -> u32 {
    peak + (peak / 10).max(1)
}

/// Split values into `bins` equal-width bins between their min and max.
///
/// When every value is the same the single range is widened by 0.5 on each
/// side. Returns no bins for empty input.
pub fn histogram_bins(values: &[u32], bins: usize) -> Vec<Bin> {
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let (low, high) = if min == max {
        (f64::from(*min) - 0.5, f64::from(*max) + 0.5)
    } else {
        (f64::from(*min), f64::from(*max))
    };
    let width = (high - low) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let offset = ((f64::from(*value) - low) / width).floor() as usize;
        counts[offset.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: low + width * i as f64,
            end: low + width * (i + 1) as f64,
            count,
        })
        .collect()
}
