//! Pass 2: statistics, text report and charts from the cleaned export.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use title_analysis::config::{DEFAULT_CLEANED_FILE, DEFAULT_REPORT_FILE};
use title_analysis::reporting::render_text;
use title_analysis::{AnalysisConfig, Pipeline, ReportOutcome, init_logging};
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Report on a cleaned streaming catalogue title dataset",
    long_about = "Reads the cleaned export written by title-prepare and produces the text \
                  report, optional JSON report and PNG charts.\n\n\
                  Exits with a non-zero status, without writing any file, when the cleaned \
                  export does not exist.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  TITLE_OUTPUT_DIR    Output directory (also where the export is read)"
)]
struct Args {
    /// Directory holding the cleaned export; reports and charts are written here
    #[arg(short, long, env = "TITLE_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// File name of the cleaned export
    #[arg(long, default_value = DEFAULT_CLEANED_FILE)]
    cleaned_name: String,

    /// File name of the text report
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    report_name: String,

    /// Number of entries in the genre and country rankings
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Year used for content age (defaults to the current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Skip chart generation
    #[arg(long)]
    no_charts: bool,

    /// Also write analysis_report.json
    #[arg(long)]
    emit_json: bool,

    /// Chart width in pixels
    #[arg(long, default_value_t = 1000)]
    chart_width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 600)]
    chart_height: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Do not echo the report to stdout; only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut builder = AnalysisConfig::builder()
        .output_dir(&args.output_dir)
        .cleaned_file_name(&args.cleaned_name)
        .report_file_name(&args.report_name)
        .top_n(args.top_n)
        .generate_charts(!args.no_charts)
        .emit_json(args.emit_json)
        .chart_size(args.chart_width, args.chart_height);

    if let Some(year) = args.reference_year {
        builder = builder.reference_year(year);
    }

    let outcome = Pipeline::builder()
        .config(builder.build()?)
        .on_progress(|update| debug!("[{}] {}", update.stage.display_name(), update.message))
        .build()?
        .report()?;

    if !args.quiet {
        print!("{}", render_text(&outcome.report));
    }
    print_outputs(&outcome);
    Ok(())
}

fn print_outputs(outcome: &ReportOutcome) {
    println!("\nReport written: {}", outcome.report_path.display());
    if let Some(json) = &outcome.json_path {
        println!("JSON report:    {}", json.display());
    }
    for chart in &outcome.charts {
        println!("Chart:          {}", chart.display());
    }
    if !outcome.failed_charts.is_empty() {
        println!("Charts that failed to render: {}", outcome.failed_charts.join(", "));
    }
}
