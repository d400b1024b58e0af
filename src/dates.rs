//! Meal plan date normalization.
//!
//! Callers send dates in whatever shape they have at hand. Airtable's date column
//! wants a timestamp, and sending UTC midnight makes the entry show up on the
//! previous day for any server west of Greenwich. So the calendar day is resolved
//! in the server's timezone and stored as local midnight with an explicit offset.

use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date: {0}")]
pub struct InvalidDate(pub String);

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Normalize `input` to local midnight in the server's timezone.
pub fn normalize_date(input: &str) -> Result<String, InvalidDate> {
    normalize_date_in(input, &Local)
}

/// Normalize `input` to midnight of its calendar day in `tz`, formatted as
/// `YYYY-MM-DDTHH:MM:SS±HH:MM`.
pub fn normalize_date_in<Tz>(input: &str, tz: &Tz) -> Result<String, InvalidDate>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let day = calendar_day_in(input, tz)?;
    let midnight = start_of_day(day, tz).ok_or_else(|| InvalidDate(input.to_string()))?;
    Ok(midnight.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

/// Resolve the calendar day `input` refers to, as seen from `tz`.
pub fn calendar_day_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<NaiveDate, InvalidDate> {
    let trimmed = input.trim();
    let invalid = || InvalidDate(input.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    // Offset-qualified instants are moved into the local zone before taking the day.
    if let Some(instant) = parse_instant(trimmed) {
        return Ok(instant.with_timezone(tz).date_naive());
    }

    // Wall-clock times without an offset are already local.
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(day);
        }
    }

    Err(invalid())
}

fn parse_instant(input: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_rfc2822(input))
        .ok()
}

/// First valid instant of `day` in `tz`.
///
/// Midnight itself may be skipped by a DST transition (e.g. America/Sao_Paulo
/// historically); step forward until the zone has a valid time.
fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    (0..=4).find_map(|hours| {
        match tz.from_local_datetime(&(midnight + Duration::hours(hours))) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => None,
        }
    })
}
