//! Statistical imputation methods.
//!
//! Provides median and mode imputation.

use crate::types::{ActionType, CleaningAction, CleaningSummary};
use crate::utils::{
    column_names, fill_numeric_nulls, fill_string_nulls, first_mode, median, replace_with_text,
    text_values,
};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing numeric values with the median of the present ones.
    ///
    /// Returns the median and the number of filled cells, or `None` when the
    /// column has no value to take a median from.
    pub fn fill_median(values: &mut [Option<f64>]) -> Option<(f64, usize)> {
        let median_val = median(values)?;
        let filled = fill_numeric_nulls(values, median_val);
        Some((median_val, filled))
    }

    /// Fill missing text values with the most frequent present value.
    ///
    /// Ties go to the value seen first in row order.
    pub fn fill_mode(values: &mut [Option<String>]) -> Option<(String, usize)> {
        let mode_val = first_mode(values)?;
        let filled = fill_string_nulls(values, &mode_val);
        Some((mode_val, filled))
    }

    /// Mode-fill every text column.
    ///
    /// Values are trimmed first and the configured null tokens become null.
    /// Numeric columns are left alone.
    pub fn fill_text_modes(
        df: DataFrame,
        null_tokens: &[String],
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let mut df = df;

        for col_name in column_names(&df) {
            let series = df.column(&col_name)?.as_materialized_series().clone();
            if series.dtype() != &DataType::String {
                continue;
            }

            let mut values: Vec<Option<String>> = text_values(&series)?
                .into_iter()
                .map(|v| {
                    v.map(|s| s.trim().to_string())
                        .filter(|s| !null_tokens.iter().any(|t| t == s))
                })
                .collect();

            if values.iter().any(Option::is_none)
                && let Some((mode_val, filled)) = Self::fill_mode(&mut values)
            {
                debug!(
                    "Filled {} nulls in '{}' with mode '{}'",
                    filled, col_name, mode_val
                );
                summary.add_action(CleaningAction::new(
                    ActionType::ValueImputed,
                    &col_name,
                    format!("Filled {} missing values with mode '{}'", filled, mode_val),
                ));
            }

            replace_with_text(&mut df, &col_name, values)?;
        }

        Ok(df)
    }
}
