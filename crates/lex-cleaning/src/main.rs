//! CLI entry point for the CSV cleaner.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use lex_cleaning::{
    BatchDriver, BatchReport, BatchSummary, CleanerConfig, FileOutcome, Pipeline, ReportGenerator,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the output directory created next to the input directory.
const DEFAULT_OUTPUT_DIR_NAME: &str = "cleaned data";

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Heuristic CSV cleaner",
    long_about = "Cleans every CSV file of a directory: canonical column names, \
                  missing-value tokens to nulls, per-column type inference, \
                  DD/MM/YYYY dates, numeric money and percentage columns.\n\n\
                  EXAMPLES:\n  \
                  # Clean ./raw into './cleaned data'\n  \
                  lex-cleaning --input-dir raw\n\n  \
                  # Preview the column decisions without writing\n  \
                  lex-cleaning --input-dir raw --dry-run\n\n  \
                  # Machine-readable batch report\n  \
                  lex-cleaning --input-dir raw --json | jq .files_failed"
)]
struct Args {
    /// Directory holding the raw CSV files
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Directory for the cleaned files
    ///
    /// Defaults to "cleaned data" next to the input directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file (keywords, sentinel tokens, thresholds)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix for cleaned file names
    #[arg(long)]
    prefix: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output the batch report as JSON on stdout
    ///
    /// Disables all logs; only the final JSON report is printed.
    #[arg(long)]
    json: bool,

    /// Write a JSON report per file and a batch report to the output directory
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Clean the files and print the column decisions without writing anything
    #[arg(long)]
    dry_run: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file (RUST_LOG)
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = load_config(&args)?;
    let pipeline = Pipeline::builder()
        .config(config)
        .build()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input_dir));

    info!("Input directory: {}", args.input_dir.display());
    if !args.dry_run {
        info!("Output directory: {}", output_dir.display());
    }

    let summary = BatchDriver::new(&pipeline, &output_dir)
        .emit_reports(args.emit_report && !args.dry_run)
        .dry_run(args.dry_run)
        .run(&args.input_dir)?;

    let report = BatchReport::from_summary(&summary);

    if args.emit_report && !args.dry_run {
        ReportGenerator::new(output_dir.clone()).write_batch_report(&report)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.dry_run {
        print_dry_run(&summary);
    } else if !args.quiet {
        print_summary(&summary);
    }

    if summary.failed_count() > 0 {
        warn!(
            "{} of {} files failed",
            summary.failed_count(),
            summary.outcomes.len()
        );
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<CleanerConfig> {
    let mut config = match &args.config {
        Some(path) => CleanerConfig::from_json_file(path)?,
        None => CleanerConfig::default(),
    };

    if let Some(prefix) = &args.prefix {
        config.output_prefix = prefix.clone();
    }

    Ok(config)
}

/// `<parent of input>/cleaned data`, or `./cleaned data` when the input has no parent.
fn default_output_dir(input_dir: &Path) -> PathBuf {
    input_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUTPUT_DIR_NAME)
}

/// Print the column decisions of every file.
///
/// Uses `println!` intentionally: this is the primary output of `--dry-run`.
fn print_dry_run(summary: &BatchSummary) {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Column decisions (nothing written)");
    println!("{}", "=".repeat(80));

    for outcome in &summary.outcomes {
        println!("\n{}", outcome.input().display());
        println!("{}", "-".repeat(40));
        match outcome {
            FileOutcome::Cleaned { summary, .. } => {
                println!(
                    "  Rows: {} -> {}",
                    summary.rows_before, summary.rows_after
                );
                println!("{:<30} {:<10} {:<10}", "  Column", "Inferred", "Final");
                for name in &summary.column_names {
                    let inferred = summary
                        .heuristic_kind(name)
                        .map(|k| k.as_str())
                        .unwrap_or("-");
                    let last = summary.final_kind(name).map(|k| k.as_str()).unwrap_or("-");
                    println!("  {:<28} {:<10} {:<10}", truncate_str(name, 27), inferred, last);
                }
            }
            FileOutcome::Failed { error, .. } => println!("  FAILED: {}", error),
        }
    }
    println!();
}

fn print_summary(summary: &BatchSummary) {
    println!("\n{}", "=".repeat(80));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(80));
    println!("  Files cleaned: {}", summary.cleaned_count());
    println!("  Files failed:  {}", summary.failed_count());
    println!("  Duration:      {}ms", summary.duration_ms);

    for outcome in &summary.outcomes {
        match outcome {
            FileOutcome::Cleaned {
                input,
                output,
                summary,
            } => println!(
                "  OK   {} -> {} ({} rows, {} duplicates removed)",
                input.display(),
                output
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                summary.rows_after,
                summary.duplicates_removed()
            ),
            FileOutcome::Failed { input, error, .. } => {
                println!("  FAIL {}: {}", input.display(), error)
            }
        }
    }
    println!("{}", "=".repeat(80));
}

/// Truncate a string to a maximum number of characters.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
