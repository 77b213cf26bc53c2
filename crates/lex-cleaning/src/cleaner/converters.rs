//! Value conversions used by the typed stages.
//!
//! Every conversion is total: a value that does not convert becomes `None`.

use crate::cleaner::dates::normalize_date_text;
use crate::utils::parse_number;

/// Strip thousands separators, then every character that is not an ASCII
/// digit, `.` or `-`.
pub(crate) fn clean_money_string(value: &str) -> String {
    value
        .replace(',', "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Strip `%` signs and surrounding whitespace.
pub(crate) fn clean_percent_string(value: &str) -> String {
    value.replace('%', "").trim().to_string()
}

/// Parse trimmed values as plain numbers.
pub(crate) fn strings_to_numbers(values: &[Option<String>]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.as_deref().and_then(parse_number))
        .collect()
}

/// Parse money-formatted values (`$1,200`, `1,000.50 USD`).
pub(crate) fn money_to_numbers(values: &[Option<String>]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| {
            v.as_deref()
                .map(clean_money_string)
                .and_then(|s| parse_number(&s))
        })
        .collect()
}

/// Parse percentage values (`10%`, ` 5 `).
pub(crate) fn percent_to_numbers(values: &[Option<String>]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| {
            v.as_deref()
                .map(clean_percent_string)
                .and_then(|s| parse_number(&s))
        })
        .collect()
}

/// Re-render date values as `DD/MM/YYYY`.
pub(crate) fn strings_to_dates(values: &[Option<String>]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| v.as_deref().and_then(normalize_date_text))
        .collect()
}
