//! Duration arithmetic over normalized duration notations.
//!
//! Recognized notations are `PT<n>M` (minutes) and `P<n>Y`, `P<n>M`,
//! `P<n>W`, `P<n>D`. Month and year steps are calendar-relative and clamp
//! the day to the end of the target month.

use std::sync::OnceLock;

use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

use heart_core::errors::TemporalError;

/// Output format of every computed value.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minutes,
    Years,
    Months,
    Weeks,
    Days,
}

fn minutes_pattern() -> Option<&'static Regex> {
    static MINUTES: OnceLock<Option<Regex>> = OnceLock::new();
    MINUTES.get_or_init(|| Regex::new(r"PT(\d+)M").ok()).as_ref()
}

fn period_pattern() -> Option<&'static Regex> {
    static PERIOD: OnceLock<Option<Regex>> = OnceLock::new();
    PERIOD.get_or_init(|| Regex::new(r"P(\d+)([YMWD])").ok()).as_ref()
}

/// Parse `YYYY-MM-DD` or an ISO date-time without zone.
pub fn parse_base(date: &str) -> Option<NaiveDateTime> {
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_notation(duration: &str) -> Option<(u32, Unit)> {
    if duration.starts_with("PT") {
        if !duration.ends_with('M') {
            return None;
        }
        let caps = minutes_pattern()?.captures(duration)?;
        return Some((caps[1].parse().ok()?, Unit::Minutes));
    }
    if !duration.starts_with('P') {
        return None;
    }
    let caps = period_pattern()?.captures(duration)?;
    let unit = match &caps[2] {
        "Y" => Unit::Years,
        "M" => Unit::Months,
        "W" => Unit::Weeks,
        _ => Unit::Days,
    };
    // The matched designator must be the notation's last one (`P1Y6M` is not `P1Y`).
    if !duration.ends_with(&caps[2]) {
        return None;
    }
    Some((caps[1].parse().ok()?, unit))
}

fn shift(base: NaiveDateTime, amount: u32, unit: Unit, neg: bool) -> Option<NaiveDateTime> {
    let months = |n: u32| {
        if neg {
            base.checked_sub_months(Months::new(n))
        } else {
            base.checked_add_months(Months::new(n))
        }
    };
    let delta = |d: Option<TimeDelta>| {
        let d = d?;
        if neg {
            base.checked_sub_signed(d)
        } else {
            base.checked_add_signed(d)
        }
    };
    let n = i64::from(amount);
    match unit {
        Unit::Minutes => delta(TimeDelta::try_minutes(n)),
        Unit::Years => months(amount.checked_mul(12)?),
        Unit::Months => months(amount),
        Unit::Weeks => delta(TimeDelta::try_weeks(n)),
        Unit::Days => delta(TimeDelta::try_days(n)),
    }
}

/// Locate a duration on the calendar: add it to (or with `neg`, subtract it
/// from) the given date.
///
/// An unrecognized notation yields `date` itself in the output format.
pub fn parse_duration_value(duration: &str, date: &str, neg: bool) -> Result<String, TemporalError> {
    let base = parse_base(date).ok_or_else(|| TemporalError::InvalidDate {
        value: date.to_string(),
    })?;
    let result = match parse_notation(duration) {
        Some((amount, unit)) => shift(base, amount, unit, neg).ok_or_else(|| TemporalError::InvalidDate {
            value: format!("{date} {} {duration}", if neg { '-' } else { '+' }),
        })?,
        None => base,
    };
    Ok(result.format(DATETIME_FORMAT).to_string())
}
