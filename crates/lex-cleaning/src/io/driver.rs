//! Batch driver: clean every input file of a directory.
//!
//! Each file is read, cleaned and written independently. A failure on one
//! file is logged and recorded, and the batch moves on to the next file.

use crate::error::{Result, ResultExt};
use crate::io::{discover_input_files, read_raw_table, write_table};
use crate::pipeline::Pipeline;
use crate::reporting::{FileReport, ReportGenerator};
use crate::types::CleaningSummary;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// What happened to one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Cleaned {
        input: PathBuf,
        /// `None` on a dry run.
        output: Option<PathBuf>,
        summary: CleaningSummary,
    },
    Failed {
        input: PathBuf,
        code: String,
        error: String,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            Self::Cleaned { input, .. } | Self::Failed { input, .. } => input,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub duration_ms: u64,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn cleaned_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Runs a [`Pipeline`] over every input file of a directory.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{BatchDriver, Pipeline};
///
/// let pipeline = Pipeline::builder().build()?;
/// let summary = BatchDriver::new(&pipeline, "cleaned data")
///     .emit_reports(true)
///     .run(Path::new("raw"))?;
/// println!("{} cleaned, {} failed", summary.cleaned_count(), summary.failed_count());
/// ```
pub struct BatchDriver<'a> {
    pipeline: &'a Pipeline,
    output_dir: PathBuf,
    reports: Option<ReportGenerator>,
    dry_run: bool,
}

impl<'a> BatchDriver<'a> {
    pub fn new(pipeline: &'a Pipeline, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            output_dir: output_dir.into(),
            reports: None,
            dry_run: false,
        }
    }

    /// Write a `<stem>_report.json` next to every cleaned file.
    pub fn emit_reports(mut self, emit: bool) -> Self {
        self.reports = emit.then(|| ReportGenerator::new(self.output_dir.clone()));
        self
    }

    /// Clean files without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Where the cleaned copy of `input` is written.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!(
            "{}{}",
            self.pipeline.config().output_prefix,
            file_name
        ))
    }

    /// Process every input file of `input_dir`.
    ///
    /// Only a missing or unreadable input directory fails the batch.
    pub fn run(&self, input_dir: &Path) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let files = discover_input_files(input_dir, &self.pipeline.config().input_extension)?;

        if files.is_empty() {
            warn!("No input files found in {}", input_dir.display());
        }
        info!(
            "Processing {} files from {}",
            files.len(),
            input_dir.display()
        );

        let mut outcomes = Vec::with_capacity(files.len());
        for input in files {
            let outcome = match self.process_file(&input) {
                Ok((output, summary)) => {
                    info!(
                        "Cleaned {} ({} -> {} rows)",
                        input.display(),
                        summary.rows_before,
                        summary.rows_after
                    );
                    FileOutcome::Cleaned {
                        input,
                        output,
                        summary,
                    }
                }
                Err(e) if e.is_file_level() => {
                    error!("Error processing {}: {}", input.display(), e);
                    FileOutcome::Failed {
                        input,
                        code: e.error_code().to_string(),
                        error: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            outcomes.push(outcome);
        }

        let summary = BatchSummary {
            input_dir: input_dir.to_path_buf(),
            output_dir: self.output_dir.clone(),
            duration_ms: start_time.elapsed().as_millis() as u64,
            outcomes,
        };

        info!(
            "Batch complete: {} cleaned, {} failed in {}ms",
            summary.cleaned_count(),
            summary.failed_count(),
            summary.duration_ms
        );

        Ok(summary)
    }

    fn process_file(&self, input: &Path) -> Result<(Option<PathBuf>, CleaningSummary)> {
        let df = read_raw_table(input)?;
        let result = self
            .pipeline
            .process(df)
            .context(input.display().to_string())?;

        if self.dry_run {
            return Ok((None, result.summary));
        }

        let output = self.output_path_for(input);
        let mut data = result.data;
        write_table(&mut data, &output)?;

        let mut summary = result.summary;
        if let Some(reports) = &self.reports {
            let report = FileReport::new(input, Some(output.as_path()), &summary);
            // The cleaned file is already written, so a missing report only warns
            if let Err(e) = reports.write_file_report(&report) {
                let message = format!(
                    "Report {} was not written: {}",
                    reports.file_report_path(&report).display(),
                    e
                );
                warn!("{}", message);
                summary.add_warning(message);
            }
        }

        Ok((Some(output), summary))
    }
}

/// Clean every input file of `input_dir` into `output_dir`.
pub fn process_directory(
    pipeline: &Pipeline,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary> {
    BatchDriver::new(pipeline, output_dir).run(input_dir)
}
