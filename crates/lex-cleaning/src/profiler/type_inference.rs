//! Heuristic per-column type inference.
//!
//! Each column is classified once, from its trimmed values:
//!
//! 1. Columns holding only nulls (or the text `nan`) are left untouched.
//! 2. **Numeric** when the count of numeric-like values is strictly greater
//!    than `numeric_threshold` times the total row count, nulls included.
//! 3. **Date** when every value in the first `date_sample_size` non-null
//!    values parses as a date. One failure in the sample rules the column out.
//! 4. **Text** otherwise.

use crate::cleaner::converters::{strings_to_dates, strings_to_numbers};
use crate::cleaner::dates::looks_like_date;
use crate::config::CleanerConfig;
use crate::imputers::StatisticalImputer;
use crate::types::{ActionType, CleaningAction, CleaningSummary, ColumnDecision, ColumnKind};
use crate::utils::{column_names, is_numeric_like, replace_with_numbers, replace_with_text, text_values};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Trim every value; the text `nan` counts as missing.
fn trimmed_values(values: Vec<Option<String>>) -> Vec<Option<String>> {
    values
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()).filter(|s| s != "nan"))
        .collect()
}

/// Classify a column from its raw values.
///
/// Returns `None` when the column has no present value at all. Values are
/// trimmed here and the text `nan` counts as missing.
pub fn classify_column(
    values: &[Option<String>],
    numeric_threshold: f64,
    date_sample_size: usize,
) -> Option<ColumnKind> {
    let present: Vec<&str> = values
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| *s != "nan")
        .collect();
    if present.is_empty() {
        return None;
    }

    let numeric_like = present.iter().filter(|v| is_numeric_like(v)).count();
    if numeric_like as f64 > numeric_threshold * values.len() as f64 {
        return Some(ColumnKind::Numeric);
    }

    let all_dates = present
        .iter()
        .take(date_sample_size)
        .all(|v| looks_like_date(v));
    if all_dates {
        return Some(ColumnKind::Date);
    }

    Some(ColumnKind::Text)
}

/// Applies heuristic classification to every column of a table.
pub struct TypeInferenceEngine<'a> {
    config: &'a CleanerConfig,
}

impl<'a> TypeInferenceEngine<'a> {
    pub fn new(config: &'a CleanerConfig) -> Self {
        Self { config }
    }

    /// Classify and convert every column.
    ///
    /// Numeric columns become `Float64` with nulls filled by the median,
    /// date columns become `DD/MM/YYYY` text and text columns are trimmed.
    pub fn infer_and_convert(
        &self,
        df: DataFrame,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let mut df = df;

        for col_name in column_names(&df) {
            let series = df.column(&col_name)?.as_materialized_series().clone();
            let values = trimmed_values(text_values(&series)?);

            let Some(kind) = classify_column(
                &values,
                self.config.numeric_threshold,
                self.config.date_sample_size,
            ) else {
                debug!("Column '{}' has no values, skipping inference", col_name);
                continue;
            };

            debug!("Column '{}' classified as {}", col_name, kind.as_str());
            summary
                .decisions
                .push(ColumnDecision::heuristic(&col_name, kind));
            summary.add_action(CleaningAction::new(
                ActionType::TypeInferred,
                &col_name,
                format!("Inferred {} from column values", kind.as_str()),
            ));

            match kind {
                ColumnKind::Numeric => {
                    let mut numbers = strings_to_numbers(&values);
                    if let Some((median_val, filled)) = StatisticalImputer::fill_median(&mut numbers)
                        && filled > 0
                    {
                        summary.add_action(CleaningAction::new(
                            ActionType::ValueImputed,
                            &col_name,
                            format!("Filled {} missing values with median {}", filled, median_val),
                        ));
                    }
                    replace_with_numbers(&mut df, &col_name, numbers)?;
                }
                ColumnKind::Date => {
                    replace_with_text(&mut df, &col_name, strings_to_dates(&values))?;
                }
                ColumnKind::Text => {
                    replace_with_text(&mut df, &col_name, values)?;
                }
            }
        }

        Ok(df)
    }
}
