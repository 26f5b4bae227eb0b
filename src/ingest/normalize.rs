//! Value-level normalization of raw CSV fields.
//!
//! Every function here is total: malformed values map to `None` and the
//! caller decides whether that nulls a field or rejects the row.

use crate::constants::WEEKDAY_NAMES;
use crate::models::{Severity, YearQuarter};
use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

/// Trailing fractional seconds, e.g. `.000000000`
static FRACTIONAL_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\d+$").unwrap_or_else(|e| panic!("invalid fractional-seconds pattern: {e}"))
});

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse an accident timestamp, ignoring any fractional seconds
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = FRACTIONAL_SECONDS.replace(trimmed, "");

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
}

/// Map a raw severity code onto the four-step scale
pub fn parse_severity(raw: Option<&str>) -> Option<Severity> {
    let trimmed = raw?.trim();
    let code = match trimmed.parse::<i64>() {
        Ok(code) => code,
        // "2.0" style exports
        Err(_) => {
            let value = trimmed.parse::<f64>().ok()?;
            if value.fract() != 0.0 {
                return None;
            }
            value as i64
        }
    };
    Severity::from_code(code)
}

pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a finite float; blanks, garbage and NaN/inf become `None`
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trim free text; empty strings become `None`
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Calendar fields derived once from the start time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub year: i32,
    pub month: i32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: i32,
    pub hour: i32,
    pub year_quarter: YearQuarter,
}

impl TimeParts {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month() as i32,
            weekday: ts.weekday().num_days_from_monday() as i32,
            hour: ts.hour() as i32,
            year_quarter: YearQuarter::from_month(ts.year(), ts.month()),
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday as usize]
    }
}
