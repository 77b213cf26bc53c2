//! Best-effort, day-first calendar date parsing.
//!
//! Free-form date text is split into components (numbers and month names)
//! after dropping weekday names, times and timezone markers. Three-part
//! numeric dates are read day-first unless the first part is a four-digit
//! year; when the second part cannot be a month the reading falls back to
//! month-first. A value missing any of day, month or year does not parse.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Output format shared with every downstream consumer.
pub const DATE_OUTPUT_FORMAT: &str = "%d/%m/%Y";

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{1,2}-\d{1,2})t\d").expect("Invalid regex: ISO datetime")
});

static TIME_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?(am|pm|z)?$").expect("Invalid regex: time")
});

static TZ_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]\d{2}:?\d{2}$").expect("Invalid regex: tz offset"));

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(st|nd|rd|th)$").expect("Invalid regex: ordinal"));

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const FILLER_TOKENS: [&str; 8] = ["am", "pm", "z", "utc", "gmt", "of", "at", "on"];

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Number(String),
    Month(u32),
}

fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    if token == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == token || (token.len() == 3 && m.starts_with(token)))
        .map(|i| i as u32 + 1)
}

fn is_weekday(token: &str) -> bool {
    token.len() >= 3
        && WEEKDAYS
            .iter()
            .any(|d| *d == token || (token.len() <= 4 && d.starts_with(token)))
}

fn is_ignorable(token: &str) -> bool {
    FILLER_TOKENS.contains(&token)
        || TIME_TOKEN.is_match(token)
        || TZ_OFFSET.is_match(token)
        || is_weekday(token)
}

fn expand_year(digits: &str) -> Option<i32> {
    let value: i32 = digits.parse().ok()?;
    match digits.len() {
        4 => Some(value),
        1 | 2 if value < 69 => Some(2000 + value),
        1 | 2 => Some(1900 + value),
        _ => None,
    }
}

fn number(digits: &str) -> Option<u32> {
    if digits.len() > 2 {
        return None;
    }
    digits.parse().ok()
}

fn tokenize(value: &str) -> Option<Vec<Part>> {
    let lowered = value.trim().to_lowercase();
    let base = match ISO_DATETIME.captures(&lowered) {
        Some(caps) => caps[1].to_string(),
        None => lowered,
    };

    let mut parts = Vec::new();
    for token in base
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        if is_ignorable(token) {
            continue;
        }

        for piece in token.split(['-', '/', '.']).filter(|p| !p.is_empty()) {
            if piece.bytes().all(|b| b.is_ascii_digit()) {
                parts.push(Part::Number(piece.to_string()));
            } else if let Some(month) = month_from_name(piece) {
                parts.push(Part::Month(month));
            } else if let Some(caps) = ORDINAL.captures(piece) {
                parts.push(Part::Number(caps[1].to_string()));
            } else if is_ignorable(piece) {
                continue;
            } else {
                return None;
            }
        }
    }

    Some(parts)
}

fn resolve_numeric(a: &str, b: &str, c: &str) -> Option<NaiveDate> {
    let first_is_year = a.len() == 4 || (a.len() <= 2 && a.parse::<u32>().ok()? > 31);

    if first_is_year {
        let year = expand_year(a)?;
        let (x, y) = (number(b)?, number(c)?);
        return NaiveDate::from_ymd_opt(year, x, y).or_else(|| NaiveDate::from_ymd_opt(year, y, x));
    }

    let (first, second) = (number(a)?, number(b)?);
    let year = expand_year(c)?;
    let (day, month) = if second <= 12 {
        (first, second)
    } else {
        (second, first)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn resolve(parts: &[Part]) -> Option<NaiveDate> {
    if let [Part::Number(compact)] = parts {
        if compact.len() != 8 {
            return None;
        }
        let year: i32 = compact[0..4].parse().ok()?;
        let month: u32 = compact[4..6].parse().ok()?;
        let day: u32 = compact[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if parts.len() != 3 {
        return None;
    }

    let months: Vec<u32> = parts
        .iter()
        .filter_map(|p| match p {
            Part::Month(m) => Some(*m),
            Part::Number(_) => None,
        })
        .collect();
    let numbers: Vec<&str> = parts
        .iter()
        .filter_map(|p| match p {
            Part::Number(n) => Some(n.as_str()),
            Part::Month(_) => None,
        })
        .collect();

    match (months.as_slice(), numbers.as_slice()) {
        ([], [a, b, c]) => resolve_numeric(a, b, c),
        ([month], [a, b]) => {
            let (day, year) = if a.len() == 4 || a.parse::<u32>().ok()? > 31 {
                (number(b)?, expand_year(a)?)
            } else {
                (number(a)?, expand_year(b)?)
            };
            NaiveDate::from_ymd_opt(year, *month, day)
        }
        _ => None,
    }
}

/// Parse free-form date text, reading ambiguous numeric dates day-first.
///
/// ```rust,ignore
/// assert_eq!(parse_day_first("03/04/2021"), NaiveDate::from_ymd_opt(2021, 4, 3));
/// assert_eq!(parse_day_first("2021-04-03"), NaiveDate::from_ymd_opt(2021, 4, 3));
/// assert_eq!(parse_day_first("Apr 3, 2021"), NaiveDate::from_ymd_opt(2021, 4, 3));
/// assert_eq!(parse_day_first("April 2021"), None);
/// ```
pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let parts = tokenize(value)?;
    resolve(&parts)
}

/// Render a date in the shared `DD/MM/YYYY` format.
pub fn render_date(date: NaiveDate) -> String {
    date.format(DATE_OUTPUT_FORMAT).to_string()
}

/// Parse and re-render a date value; anything unparseable becomes `None`.
pub fn normalize_date_text(value: &str) -> Option<String> {
    parse_day_first(value).map(render_date)
}

/// Whether a value parses as a date.
pub fn looks_like_date(value: &str) -> bool {
    parse_day_first(value).is_some()
}
