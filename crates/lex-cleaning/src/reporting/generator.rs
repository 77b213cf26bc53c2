use crate::io::{BatchSummary, FileOutcome};
use crate::types::{CleaningSummary, ColumnDecision};
use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp format used in every report.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Report for one cleaned file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    /// Path of the cleaned file, if one was written
    pub output_file: Option<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
    pub duplicates_removed: usize,
    pub sentinels_replaced: usize,
    /// Final kind of every column, in table order
    pub column_kinds: Vec<ColumnDecision>,
    pub summary: CleaningSummary,
}

impl FileReport {
    pub fn new(input: &Path, output: Option<&Path>, summary: &CleaningSummary) -> Self {
        let column_kinds = summary
            .column_names
            .iter()
            .filter_map(|name| {
                summary
                    .decisions
                    .iter()
                    .rev()
                    .find(|d| &d.column == name)
                    .cloned()
            })
            .collect();

        Self {
            generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            input_file: input.display().to_string(),
            output_file: output.map(|p| p.display().to_string()),
            rows_before: summary.rows_before,
            rows_after: summary.rows_after,
            columns: summary.columns,
            duplicates_removed: summary.duplicates_removed(),
            sentinels_replaced: summary.sentinels_replaced,
            column_kinds,
            summary: summary.clone(),
        }
    }

    /// Base name for the report file: the input's file stem.
    pub fn base_name(&self) -> String {
        Path::new(&self.input_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table".to_string())
    }
}

/// Report for a whole batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub input_dir: String,
    pub output_dir: String,
    pub duration_ms: u64,
    pub files_total: usize,
    pub files_cleaned: usize,
    pub files_failed: usize,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn from_summary(summary: &BatchSummary) -> Self {
        Self {
            generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            input_dir: summary.input_dir.display().to_string(),
            output_dir: summary.output_dir.display().to_string(),
            duration_ms: summary.duration_ms,
            files_total: summary.outcomes.len(),
            files_cleaned: summary.cleaned_count(),
            files_failed: summary.failed_count(),
            files: summary.outcomes.clone(),
        }
    }
}

/// Writes JSON reports into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write `<stem>_report.json` for one file.
    pub fn write_file_report(&self, report: &FileReport) -> Result<PathBuf> {
        self.write_json(report, &Self::file_report_name(report))
    }

    /// Where [`write_file_report`](Self::write_file_report) puts a report.
    pub fn file_report_path(&self, report: &FileReport) -> PathBuf {
        self.output_dir.join(Self::file_report_name(report))
    }

    fn file_report_name(report: &FileReport) -> String {
        format!("{}_report.json", report.base_name())
    }

    /// Write `batch_report.json`.
    pub fn write_batch_report(&self, report: &BatchReport) -> Result<PathBuf> {
        self.write_json(report, "batch_report.json")
    }

    fn write_json<T: Serialize>(&self, report: &T, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(file_name);
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;
    use tempfile::TempDir;

    fn sample_summary() -> CleaningSummary {
        let mut summary = CleaningSummary::new();
        summary.rows_before = 4;
        summary.rows_after = 3;
        summary.columns = 2;
        summary.duplicates_removed_initial = 1;
        summary.column_names = vec!["ship_date".to_string(), "qty".to_string()];
        summary
            .decisions
            .push(ColumnDecision::heuristic("ship_date", ColumnKind::Text));
        summary
            .decisions
            .push(ColumnDecision::heuristic("qty", ColumnKind::Numeric));
        summary
            .decisions
            .push(ColumnDecision::rule("ship_date", ColumnKind::Date, "date"));
        summary
    }

    #[test]
    fn test_file_report_uses_final_kinds() {
        let report = FileReport::new(Path::new("raw/orders.csv"), None, &sample_summary());

        let kinds: Vec<(String, ColumnKind)> = report
            .column_kinds
            .iter()
            .map(|d| (d.column.clone(), d.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("ship_date".to_string(), ColumnKind::Date),
                ("qty".to_string(), ColumnKind::Numeric)
            ]
        );
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.base_name(), "orders");
    }

    #[test]
    fn test_write_file_report() {
        let dir = TempDir::new().unwrap();
        let generator = ReportGenerator::new(dir.path().to_path_buf());
        let report = FileReport::new(Path::new("orders.csv"), None, &sample_summary());

        let path = generator.write_file_report(&report).unwrap();

        assert_eq!(path, dir.path().join("orders_report.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["rows_after"], 3);
        assert_eq!(written["column_kinds"][0]["kind"], "date");
    }
}
