//! Sentinel replacement and duplicate row removal.

use anyhow::Result;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Replace every cell that exactly equals a sentinel token with null.
///
/// Matching is exact: no trimming or case folding, so `" NA"` survives and is
/// handled later by the typed stages. Only text columns are inspected.
pub(crate) fn replace_sentinels(df: DataFrame, tokens: &[String]) -> Result<(DataFrame, usize)> {
    let mut df = df;
    let sentinels: HashSet<&str> = tokens.iter().map(|s| s.as_str()).collect();
    let column_names = crate::utils::column_names(&df);

    let mut total_replacements = 0;

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String {
            continue;
        }

        let str_series = series.str()?;
        let mut cleaned_values = Vec::with_capacity(str_series.len());
        let mut count = 0;

        for opt_val in str_series.into_iter() {
            match opt_val {
                Some(val) if sentinels.contains(val) => {
                    cleaned_values.push(None);
                    count += 1;
                }
                Some(val) => cleaned_values.push(Some(val.to_string())),
                None => cleaned_values.push(None),
            }
        }

        if count > 0 {
            total_replacements += count;
            crate::utils::replace_with_text(&mut df, col_name, cleaned_values)?;
        }
    }

    if total_replacements > 0 {
        debug!("Replaced {} sentinel values with null", total_replacements);
    }

    Ok((df, total_replacements))
}

/// Drop rows equal to an earlier row over all columns, keeping the first
/// occurrence and the order of the surviving rows.
pub(crate) fn remove_duplicate_rows(df: DataFrame) -> Result<(DataFrame, usize)> {
    if df.width() == 0 || df.height() < 2 {
        return Ok((df, 0));
    }

    let before = df.height();
    let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = before - deduped.height();

    if removed > 0 {
        debug!("Removed {} duplicate rows", removed);
    } else {
        debug!("No duplicate rows found");
    }

    Ok((deduped, removed))
}
