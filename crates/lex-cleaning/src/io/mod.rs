//! Table input and output.
//!
//! Input files are read with schema inference turned off, so every cell
//! reaches the pipeline as raw text. Output is plain CSV with a header row.

mod driver;

pub use driver::{BatchDriver, BatchSummary, FileOutcome, process_directory};

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// List the files in `dir` with the given extension.
///
/// Not recursive. The extension match ignores case and a leading dot.
/// Returns files sorted by file name.
pub fn discover_input_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CleaningError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let wanted = extension.trim_start_matches('.');
    let entries = fs::read_dir(dir).map_err(|_| CleaningError::DirectoryNotFound {
        path: dir.to_path_buf(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(wanted))
            .unwrap_or(false);

        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Discovered {} input files in {}", files.len(), dir.display());

    Ok(files)
}

/// Read a CSV file with a header row, keeping every cell as text.
///
/// The header row is taken verbatim. Polars would rename a repeated header
/// on its own, so it is read as a data row instead and applied afterwards.
pub fn read_raw_table(path: &Path) -> Result<DataFrame> {
    let read_failed = |e: PolarsError| CleaningError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let raw = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(read_failed)?
        .finish()
        .map_err(read_failed)?;

    if raw.height() == 0 {
        return Ok(raw);
    }

    let mut headers = Vec::with_capacity(raw.width());
    for column in raw.get_columns() {
        let name = column.str().map_err(read_failed)?.get(0).unwrap_or_default();
        headers.push(name.to_string());
    }

    let mut df = raw.slice(1, raw.height() - 1);
    df.set_column_names(distinct_headers(headers).iter().map(|s| s.as_str()))
        .map_err(read_failed)?;

    Ok(df)
}

/// Make exact header repeats distinct by padding them with trailing spaces.
///
/// A frame cannot hold two columns with one name. Header normalization trims
/// the padding, so the repeat still reaches the collision policy.
fn distinct_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let mut candidate = header;
        while seen.contains(&candidate) {
            candidate.push(' ');
        }
        seen.insert(candidate.clone());
        result.push(candidate);
    }

    result
}

/// Write a table as CSV, creating the parent directory if needed.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let write_failed = |reason: String| CleaningError::WriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
    }

    let mut file = File::create(path).map_err(|e| write_failed(e.to_string()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .map_err(|e| write_failed(e.to_string()))?;

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
