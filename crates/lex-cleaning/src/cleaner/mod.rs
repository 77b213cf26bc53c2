//! Cell and header level cleaning.
//!
//! This module provides functionality for:
//! - Canonicalizing column names
//! - Replacing sentinel tokens with nulls
//! - Removing duplicate rows
//! - Parsing dates, money and percentages

pub(crate) mod converters;
pub mod dates;
pub(crate) mod headers;
pub(crate) mod sanitizers;

pub use dates::{DATE_OUTPUT_FORMAT, looks_like_date, normalize_date_text, parse_day_first, render_date};
pub use headers::{normalize_column_name, normalize_column_names};

/// Parse a money-formatted value (`$1,200`, `1,000.50 USD`) as a number.
pub fn parse_money(value: &str) -> Option<f64> {
    crate::utils::parse_number(&converters::clean_money_string(value))
}

/// Parse a percentage value (`10%`, ` 5 `) as a number.
pub fn parse_percent(value: &str) -> Option<f64> {
    crate::utils::parse_number(&converters::clean_percent_string(value))
}
