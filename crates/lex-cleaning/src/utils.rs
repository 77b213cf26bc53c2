//! Shared utilities for the cleaning pipeline.
//!
//! Column access helpers, the numeric-like test, number parsing and the
//! median/mode statistics used by the imputers.

use anyhow::Result;
use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Column Access Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column names of a DataFrame as owned strings, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a column as optional text, one entry per row.
///
/// String columns are returned as-is; numeric columns are rendered with
/// [`render_number`]. Nulls stay `None`.
pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()),
        dtype if is_numeric_dtype(dtype) => {
            let floats = series.cast(&DataType::Float64)?;
            Ok(floats
                .f64()?
                .into_iter()
                .map(|v| v.map(render_number))
                .collect())
        }
        _ => {
            let as_text = series.cast(&DataType::String)?;
            Ok(as_text
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect())
        }
    }
}

/// Replace a column with a new text column of the same name.
pub fn replace_with_text(
    df: &mut DataFrame,
    col_name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    let series = Series::new(col_name.into(), values);
    df.replace(col_name, series)?;
    Ok(())
}

/// Replace a column with a new `Float64` column of the same name.
pub fn replace_with_numbers(
    df: &mut DataFrame,
    col_name: &str,
    values: Vec<Option<f64>>,
) -> Result<()> {
    let series = Series::new(col_name.into(), values);
    df.replace(col_name, series)?;
    Ok(())
}

/// Case-insensitive substring match of a column name against keywords.
pub fn name_contains_any(col_name: &str, keywords: &[String]) -> bool {
    let lower = col_name.to_lowercase();
    keywords
        .iter()
        .any(|k| lower.contains(k.to_lowercase().as_str()))
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Whether a value is numeric-like: after removing the first `.` and the
/// first `-`, it is a non-empty run of ASCII digits.
///
/// ```rust,ignore
/// assert!(is_numeric_like("-12.5"));
/// assert!(is_numeric_like("1-2"));
/// assert!(!is_numeric_like("1.2.3"));
/// assert!(!is_numeric_like("1,000"));
/// ```
pub fn is_numeric_like(s: &str) -> bool {
    let stripped = s.replacen('.', "", 1).replacen('-', "", 1);
    !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a value as a finite number. Anything else, including `nan` and
/// infinities, is `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a number as text.
///
/// Uses the shortest representation that parses back to the same value, and
/// never switches to exponent notation, so stripping formatting characters
/// from the result is lossless.
pub fn render_number(value: f64) -> String {
    format!("{}", value)
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Median of the non-null values, or `None` when there are none.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let series = Series::new("median".into(), values);
    series.median()
}

/// Most frequent non-null value. Ties go to the value seen first in row order.
pub fn first_mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for val in values.iter().flatten() {
        *counts.entry(val.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for val in values.iter().flatten() {
        let count = counts[val.as_str()];
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((val.as_str(), count)),
        }
    }

    best.map(|(val, _)| val.to_string())
}

// =============================================================================
// Fill Utilities
// =============================================================================

/// Fill missing numeric values with a fixed value. Returns the number filled.
pub fn fill_numeric_nulls(values: &mut [Option<f64>], fill_value: f64) -> usize {
    let mut filled = 0;
    for slot in values.iter_mut().filter(|v| v.is_none()) {
        *slot = Some(fill_value);
        filled += 1;
    }
    filled
}

/// Fill missing text values with a fixed value. Returns the number filled.
pub fn fill_string_nulls(values: &mut [Option<String>], fill_value: &str) -> usize {
    let mut filled = 0;
    for slot in values.iter_mut().filter(|v| v.is_none()) {
        *slot = Some(fill_value.to_string());
        filled += 1;
    }
    filled
}

// =============================================================================
// Tests
// =============================================================================
