//! Date patterns shared by normalization, merging and ordering.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

fn date_pattern() -> Option<&'static Regex> {
    static DATE: OnceLock<Option<Regex>> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").ok()).as_ref()
}

fn month_pattern() -> Option<&'static Regex> {
    static MONTH: OnceLock<Option<Regex>> = OnceLock::new();
    MONTH.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").ok()).as_ref()
}

fn year_pattern() -> Option<&'static Regex> {
    static YEAR: OnceLock<Option<Regex>> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"^\d{4}$").ok()).as_ref()
}

/// The first `YYYY-MM-DD` occurring anywhere in a normalized value.
pub fn find_date(value: &str) -> Option<&str> {
    date_pattern()?.find(value).map(|m| m.as_str())
}

/// Whether the value begins with a `YYYY-MM-DD` date.
pub fn starts_with_date(value: &str) -> bool {
    date_pattern()
        .and_then(|re| re.find(value))
        .is_some_and(|m| m.start() == 0)
}

/// Pad a month-only (`YYYY-MM`) or year-only (`YYYY`) value to a full date.
pub fn pad_partial_date(value: &str) -> Option<String> {
    if month_pattern()?.is_match(value) {
        Some(format!("{value}-01"))
    } else if year_pattern()?.is_match(value) {
        Some(format!("{value}-01-01"))
    } else {
        None
    }
}

/// The calendar date found in a value, if it is a real date.
pub fn calendar_date(value: &str) -> Option<NaiveDate> {
    find_date(value).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}
