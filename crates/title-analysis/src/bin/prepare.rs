//! Pass 1: load (or synthesize) the raw title table, clean it and export it.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use title_analysis::config::{DEFAULT_CLEANED_FILE, DEFAULT_INPUT_FILE};
use title_analysis::{AnalysisConfig, Pipeline, PrepareOutcome, init_logging};
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a streaming catalogue title dataset",
    long_about = "Loads the raw title table, applies the per-column cleaning policies and \
                  writes the cleaned export read by title-report.\n\n\
                  When the input file does not exist, a seeded synthetic sample is generated \
                  (and saved to the input path unless --no-write-sample is given).\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  TITLE_INPUT         Raw dataset path\n  \
                  TITLE_OUTPUT_DIR    Output directory"
)]
struct Args {
    /// Raw dataset (CSV with a header row)
    #[arg(short, long, env = "TITLE_INPUT", default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Output directory for the cleaned export
    #[arg(short, long, env = "TITLE_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// File name of the cleaned export
    #[arg(long, default_value = DEFAULT_CLEANED_FILE)]
    cleaned_name: String,

    /// Seed for synthetic data generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of synthetic rows to generate when the input is missing
    #[arg(long, default_value_t = 100)]
    sample_size: usize,

    /// Do not save synthesized rows to the input path
    #[arg(long)]
    no_write_sample: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings, errors and the final summary
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
    let config = AnalysisConfig::builder()
        .input_path(&args.input)
        .output_dir(&args.output_dir)
        .cleaned_file_name(&args.cleaned_name)
        .seed(args.seed)
        .sample_size(args.sample_size)
        .write_sample(!args.no_write_sample)
        .build()?;

    let outcome = Pipeline::builder()
        .config(config)
        .on_progress(|update| debug!("[{}] {}", update.stage.display_name(), update.message))
        .build()?
        .prepare()?;

    print_summary(&outcome);
    Ok(())
}

/// Human-readable summary of pass 1.
///
/// Uses `println!` so it is shown regardless of the log level.
fn print_summary(outcome: &PrepareOutcome) {
    let summary = &outcome.summary;

    println!("\n{}", "=".repeat(60));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("  Source:       {}", outcome.source);
    if let Some(sample) = &outcome.sample_path {
        println!("  Sample saved: {}", sample.display());
    }
    println!(
        "  Rows:         {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed(),
        summary.rows_removed_percentage()
    );
    println!("  Filled:       {} values", summary.total_filled());

    let missing: Vec<String> = summary
        .missing_before
        .iter()
        .filter(|c| c.missing > 0)
        .map(|c| format!("{} ({})", c.column, c.missing))
        .collect();
    if !missing.is_empty() {
        println!("  Missing before cleaning: {}", missing.join(", "));
    }

    if !summary.actions.is_empty() {
        println!("\n  Actions:");
        for action in &summary.actions {
            println!("    - {}", action);
        }
    }

    println!("\n  Cleaned export: {}", outcome.export_path.display());
    println!("{}", "=".repeat(60));
}
