//! Integration tests for the batch driver.

use lex_cleaning::io::read_raw_table;
use lex_cleaning::{
    BatchDriver, CleanerConfig, CollisionPolicy, FileOutcome, Pipeline, process_directory,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy fixtures into a fresh input directory.
fn input_dir_with(fixtures: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in fixtures {
        fs::copy(fixtures_path().join(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

#[test]
fn test_batch_continues_past_failed_file() {
    let input = input_dir_with(&["collision.csv", "field.csv", "sales.csv"]);
    let output = TempDir::new().unwrap();

    let config = CleanerConfig::builder()
        .column_collision(CollisionPolicy::Reject)
        .build()
        .unwrap();
    let pipeline = Pipeline::builder().config(config).build().unwrap();

    let summary = process_directory(&pipeline, input.path(), output.path()).unwrap();

    let inputs: Vec<String> = summary.outcomes.iter().map(|o| file_name(o.input())).collect();
    assert_eq!(inputs, vec!["collision.csv", "field.csv", "sales.csv"]);
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.cleaned_count(), 2);

    match &summary.outcomes[0] {
        FileOutcome::Failed { code, error, .. } => {
            assert_eq!(code, "COLUMN_COLLISION");
            assert!(error.contains("collision.csv"));
        }
        other => panic!("expected a failure, got {:?}", other),
    }

    let cleaned = read_raw_table(&output.path().join("cleaned_sales.csv")).unwrap();
    assert_eq!(cleaned.height(), 4);
    assert!(output.path().join("cleaned_field.csv").is_file());
    assert!(!output.path().join("cleaned_collision.csv").exists());
}

#[test]
fn test_suffixed_collision_is_cleaned() {
    let input = input_dir_with(&["collision.csv"]);
    let output = TempDir::new().unwrap();
    let pipeline = Pipeline::builder().build().unwrap();

    let summary = process_directory(&pipeline, input.path(), output.path()).unwrap();
    assert_eq!(summary.failed_count(), 0);

    let cleaned = read_raw_table(&output.path().join("cleaned_collision.csv")).unwrap();
    let names: Vec<String> = cleaned
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["total_cost", "total_cost_2"]);
}

#[test]
fn test_repeated_raw_header_follows_collision_policy() {
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("repeat.csv"), "Qty,Qty\n1,2\n3,4\n").unwrap();

    let output = TempDir::new().unwrap();
    let pipeline = Pipeline::builder().build().unwrap();
    let summary = process_directory(&pipeline, input.path(), output.path()).unwrap();
    assert_eq!(summary.failed_count(), 0);

    let cleaned = read_raw_table(&output.path().join("cleaned_repeat.csv")).unwrap();
    let names: Vec<String> = cleaned
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["qty", "qty_2"]);

    let rejecting = TempDir::new().unwrap();
    let config = CleanerConfig::builder()
        .column_collision(CollisionPolicy::Reject)
        .build()
        .unwrap();
    let pipeline = Pipeline::builder().config(config).build().unwrap();
    let summary = process_directory(&pipeline, input.path(), rejecting.path()).unwrap();

    match &summary.outcomes[0] {
        FileOutcome::Failed { code, .. } => assert_eq!(code, "COLUMN_COLLISION"),
        other => panic!("expected a failure, got {:?}", other),
    }
    assert!(!rejecting.path().join("cleaned_repeat.csv").exists());
}

#[test]
fn test_unwritable_output_is_per_file() {
    let input = input_dir_with(&["field.csv", "sales.csv"]);
    let blocker = TempDir::new().unwrap();
    // A regular file where the output directory should be
    let output = blocker.path().join("not_a_dir");
    fs::write(&output, "").unwrap();

    let pipeline = Pipeline::builder().build().unwrap();
    let summary = process_directory(&pipeline, input.path(), &output).unwrap();

    assert_eq!(summary.failed_count(), 2);
    for outcome in &summary.outcomes {
        match outcome {
            FileOutcome::Failed { code, .. } => assert_eq!(code, "WRITE_FAILED"),
            other => panic!("expected a failure, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_input_directory_fails_batch() {
    let root = TempDir::new().unwrap();
    let pipeline = Pipeline::builder().build().unwrap();

    let err = process_directory(&pipeline, &root.path().join("absent"), root.path()).unwrap_err();
    assert_eq!(err.error_code(), "DIRECTORY_NOT_FOUND");
}

#[test]
fn test_reports_and_prefix() {
    let input = input_dir_with(&["sales.csv"]);
    let output = TempDir::new().unwrap();

    let config = CleanerConfig::builder()
        .output_prefix("clean_")
        .build()
        .unwrap();
    let pipeline = Pipeline::builder().config(config).build().unwrap();

    let summary = BatchDriver::new(&pipeline, output.path())
        .emit_reports(true)
        .run(input.path())
        .unwrap();

    assert_eq!(summary.cleaned_count(), 1);
    assert!(output.path().join("clean_sales.csv").is_file());

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(output.path().join("sales_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["rows_before"], 5);
    assert_eq!(report["rows_after"], 4);
    assert_eq!(report["duplicates_removed"], 1);
}

#[test]
fn test_report_failure_keeps_cleaned_outcome() {
    let input = input_dir_with(&["sales.csv"]);
    let output = TempDir::new().unwrap();
    // A directory in the report's place makes the report write fail
    fs::create_dir(output.path().join("sales_report.json")).unwrap();

    let pipeline = Pipeline::builder().build().unwrap();
    let summary = BatchDriver::new(&pipeline, output.path())
        .emit_reports(true)
        .run(input.path())
        .unwrap();

    assert_eq!(summary.failed_count(), 0);
    assert!(output.path().join("cleaned_sales.csv").is_file());

    match &summary.outcomes[0] {
        FileOutcome::Cleaned { summary, .. } => {
            assert!(
                summary
                    .warnings
                    .iter()
                    .any(|w| w.contains("sales_report.json"))
            );
        }
        other => panic!("expected a cleaned file, got {:?}", other),
    }
}

#[test]
fn test_non_matching_files_ignored() {
    let input = input_dir_with(&["sales.csv"]);
    fs::write(input.path().join("notes.txt"), "not a table").unwrap();
    let output = TempDir::new().unwrap();

    let pipeline = Pipeline::builder().build().unwrap();
    let summary = process_directory(&pipeline, input.path(), output.path()).unwrap();

    assert_eq!(summary.outcomes.len(), 1);
}
