//! The two analysis passes.
//!
//! Pass 1 (`prepare`) loads or synthesizes the raw table, cleans it and
//! writes the cleaned export. Pass 2 (`report`) reads that export back and
//! produces the text report, the optional JSON report and the charts.

use crate::charts::ChartRenderer;
use crate::cleaner::TitleCleaner;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::exporter::CsvExporter;
use crate::loader::DataLoader;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{AnalysisReport, ReportGenerator};
use crate::types::{PrepareOutcome, ReportOutcome};
use std::fs;
use std::sync::Arc;
use tracing::{error, info};

/// Runs the prepare and report passes for one configuration.
///
/// # Example
///
/// ```rust,ignore
/// use title_analysis::{AnalysisConfig, Pipeline};
///
/// let pipeline = Pipeline::builder()
///     .config(AnalysisConfig::builder().output_dir("out").build()?)
///     .build()?;
///
/// let prepared = pipeline.prepare()?;
/// let reported = pipeline.report()?;
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    loader: DataLoader,
    cleaner: TitleCleaner,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Pass 1: load or synthesize, clean, export.
    pub fn prepare(&self) -> Result<PrepareOutcome> {
        self.finish(self.prepare_internal())
    }

    /// Pass 2: statistics, charts and reports from the cleaned export.
    ///
    /// Fails with `MissingCleanedExport` before writing anything when the
    /// export does not exist.
    pub fn report(&self) -> Result<ReportOutcome> {
        self.finish(self.report_internal())
    }

    fn finish<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.report_progress(ProgressUpdate::complete("Pass completed successfully"));
                Ok(value)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn prepare_internal(&self) -> Result<PrepareOutcome> {
        let input = self.config.input();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            format!("Loading {}", input.display()),
        ));
        let dataset = self.loader.load_or_synthesize(Some(input))?;
        let sample_path = self.loader.persist_sample(&dataset, input)?;
        info!("Dataset source: {}", dataset.source);

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Cleaning,
            format!("Cleaning {} rows", dataset.data.height()),
        ));
        let (cleaned, summary) = self.cleaner.clean(dataset.data)?;
        for action in &summary.actions {
            info!("{}", action);
        }

        let export_path = self.config.cleaned_path();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Exporting,
            format!("Writing {}", export_path.display()),
        ));
        let export_path = CsvExporter::export_cleaned(&cleaned, &export_path)?;

        Ok(PrepareOutcome {
            source: dataset.source,
            cleaned,
            summary,
            export_path,
            sample_path,
        })
    }

    fn report_internal(&self) -> Result<ReportOutcome> {
        let cleaned_path = self.config.cleaned_path();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            format!("Loading {}", cleaned_path.display()),
        ));
        let df = DataLoader::load_cleaned(&cleaned_path)?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Computing,
            format!("Analyzing {} titles", df.height()),
        ));
        let mut report = AnalysisReport::build(&df, &cleaned_path, &self.config)?;

        fs::create_dir_all(&self.config.output_dir)?;

        let mut charts = Vec::new();
        let mut failed_charts = Vec::new();
        if self.config.generate_charts {
            self.report_progress(ProgressUpdate::new(
                AnalysisStage::Charting,
                "Rendering charts",
            ));
            let renderer = ChartRenderer::new(
                &self.config.output_dir,
                self.config.chart_width,
                self.config.chart_height,
            );
            let outcome = renderer.render_all(&report);
            report.charts = outcome
                .written
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            charts = outcome.written;
            failed_charts = outcome.failed;
        }

        self.report_progress(ProgressUpdate::new(AnalysisStage::Writing, "Writing reports"));
        let generator = ReportGenerator::new(&self.config.output_dir);
        let report_path = generator.write_text(&report, &self.config.report_file_name)?;
        let json_path = if self.config.emit_json {
            Some(generator.write_json(&report)?)
        } else {
            None
        };

        Ok(ReportOutcome {
            report,
            report_path,
            json_path,
            charts,
            failed_charts,
        })
    }
}

/// Builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the configuration. Defaults to [`AnalysisConfig::default()`].
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a closure as progress reporter.
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter(Arc::new(ClosureProgressReporter::new(callback)))
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            loader: DataLoader::from_config(&config),
            cleaner: TitleCleaner,
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

/// Run pass 1 with a configuration.
pub fn run_prepare(config: &AnalysisConfig) -> Result<PrepareOutcome> {
    Pipeline::builder().config(config.clone()).build()?.prepare()
}

/// Run pass 2 with a configuration.
pub fn run_report(config: &AnalysisConfig) -> Result<ReportOutcome> {
    Pipeline::builder().config(config.clone()).build()?.report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn config_in(dir: &std::path::Path) -> AnalysisConfig {
        AnalysisConfig::builder()
            .input_path(dir.join("raw.csv"))
            .output_dir(dir.join("out"))
            .sample_size(40)
            .reference_year(2024)
            .generate_charts(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_prepare_synthesizes_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let outcome = run_prepare(&config).unwrap();
        assert!(outcome.export_path.exists());
        assert_eq!(outcome.sample_path.as_deref(), Some(dir.path().join("raw.csv").as_path()));
        assert_eq!(outcome.summary.rows_before, 40);
        assert_eq!(outcome.cleaned.height(), outcome.summary.rows_after);
    }

    #[test]
    fn test_report_without_export_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let err = run_report(&config).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_CLEANED_EXPORT");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_report_after_prepare() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            emit_json: true,
            ..config_in(dir.path())
        };

        let prepared = run_prepare(&config).unwrap();
        let reported = run_report(&config).unwrap();

        assert!(reported.report_path.exists());
        assert!(reported.json_path.as_ref().is_some_and(|p| p.exists()));
        assert!(reported.charts.is_empty());
        assert_eq!(reported.report.rows, prepared.cleaned.height());
        let type_total: usize = reported.report.type_counts.iter().map(|c| c.count).sum();
        assert_eq!(type_total, reported.report.rows);
    }

    #[test]
    fn test_progress_stages() {
        let dir = tempfile::tempdir().unwrap();
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        let pipeline = Pipeline::builder()
            .config(config_in(dir.path()))
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();
        pipeline.prepare().unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                AnalysisStage::Loading,
                AnalysisStage::Cleaning,
                AnalysisStage::Exporting,
                AnalysisStage::Complete,
            ]
        );
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = AnalysisConfig {
            top_n: 0,
            ..AnalysisConfig::default()
        };
        let err = Pipeline::builder().config(config).build().err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
