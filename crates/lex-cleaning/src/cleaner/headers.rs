//! Header canonicalization.

use crate::config::CollisionPolicy;
use crate::error::{CleaningError, Result};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_]").expect("Invalid regex: header charset"));

/// Canonicalize a single header.
///
/// Trims, lowercases, turns spaces into underscores and drops everything
/// outside `[a-z0-9_]`. A header that ends up empty is returned empty.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase().replace(' ', "_");
    INVALID_NAME_CHARS.replace_all(&lowered, "").into_owned()
}

/// Canonicalize a header sequence, resolving names that collide after
/// normalization according to `policy`.
pub fn normalize_column_names(names: &[String], policy: CollisionPolicy) -> Result<Vec<String>> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut first_source: Vec<(String, String)> = Vec::new();
    let mut result = Vec::with_capacity(names.len());

    for original in names {
        let normalized = normalize_column_name(original);

        if !taken.contains(&normalized) {
            taken.insert(normalized.clone());
            first_source.push((normalized.clone(), original.clone()));
            result.push(normalized);
            continue;
        }

        match policy {
            CollisionPolicy::Reject => {
                let first = first_source
                    .iter()
                    .find(|(n, _)| *n == normalized)
                    .map(|(_, o)| o.clone())
                    .unwrap_or_default();
                return Err(CleaningError::ColumnCollision {
                    first,
                    second: original.clone(),
                    normalized,
                });
            }
            CollisionPolicy::Suffix => {
                let mut n = 2;
                let mut candidate = format!("{}_{}", normalized, n);
                while taken.contains(&candidate) {
                    n += 1;
                    candidate = format!("{}_{}", normalized, n);
                }
                warn!(
                    "Column '{}' collides with an earlier column as '{}', renamed to '{}'",
                    original, normalized, candidate
                );
                taken.insert(candidate.clone());
                first_source.push((candidate.clone(), original.clone()));
                result.push(candidate);
            }
        }
    }

    Ok(result)
}

/// Rename every column of `df` to its canonical name.
///
/// Returns the renamed frame and the `(original, normalized)` pairs that changed.
pub(crate) fn normalize_headers(
    df: DataFrame,
    policy: CollisionPolicy,
) -> Result<(DataFrame, Vec<(String, String)>)> {
    let mut df = df;
    let originals = crate::utils::column_names(&df);
    let normalized = normalize_column_names(&originals, policy)?;

    let renames: Vec<(String, String)> = originals
        .iter()
        .zip(normalized.iter())
        .filter(|(o, n)| o != n)
        .map(|(o, n)| (o.clone(), n.clone()))
        .collect();

    if !renames.is_empty() {
        df.set_column_names(normalized.iter().map(|s| s.as_str()))?;
        debug!("Renamed {} columns", renames.len());
    }

    Ok((df, renames))
}
