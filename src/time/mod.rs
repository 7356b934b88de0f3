//! Time module for Julian date conversions
//!
//! The propagator works in Julian dates while the simulated clock works in
//! UTC calendar instants with millisecond resolution. This module is the
//! single place where the two meet. The conversion
//!
//! ```text
//! JD = unix_millis / 86_400_000 + 2440587.5
//! ```
//!
//! is evaluated exactly as written so that propagated positions stay anchored
//! to the same epoch as the element catalogs.

use crate::constants::{DAY_MS_F64, J2000_UNIX_MS, MAX_DATE_MS, MIN_DATE_MS, UNIX_EPOCH_JD};
use crate::{OrreryError, Result};
use chrono::{DateTime, NaiveDate, SubsecRound, TimeZone, Utc};

/// Convert Unix milliseconds to a Julian date
pub fn julian_date_from_unix_millis(millis: i64) -> f64 {
    (millis as f64 / DAY_MS_F64) + UNIX_EPOCH_JD
}

/// Convert a UTC instant to a Julian date
pub fn julian_date(instant: &DateTime<Utc>) -> f64 {
    julian_date_from_unix_millis(instant.timestamp_millis())
}

/// Convert a Julian date to Unix milliseconds, rounded to the nearest millisecond
pub fn unix_millis_from_julian_date(jd: f64) -> Result<i64> {
    if !jd.is_finite() {
        return Err(OrreryError::InvalidDate(format!("Julian date {jd}")));
    }
    let millis = ((jd - UNIX_EPOCH_JD) * DAY_MS_F64).round();
    if millis.abs() > i64::MAX as f64 {
        return Err(OrreryError::InvalidDate(format!("Julian date {jd}")));
    }
    Ok(millis as i64)
}

/// Convert a Julian date to a UTC instant
pub fn datetime_from_julian_date(jd: f64) -> Result<DateTime<Utc>> {
    datetime_from_unix_millis(unix_millis_from_julian_date(jd)?)
}

/// Convert Unix milliseconds to a UTC instant
pub fn datetime_from_unix_millis(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| OrreryError::InvalidDate(format!("{millis} ms since the Unix epoch")))
}

/// Drop everything below the millisecond, matching the clock's step resolution
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

// The fixed instants below are well inside chrono's representable range
fn fixed_instant(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

/// The J2000.0 reference instant, 2000-01-01T12:00:00 UTC
pub fn j2000_instant() -> DateTime<Utc> {
    fixed_instant(J2000_UNIX_MS)
}

/// Earliest simulated date, 1900-01-01 UTC
pub fn min_date() -> DateTime<Utc> {
    fixed_instant(MIN_DATE_MS)
}

/// Latest simulated date, 2100-12-31 UTC
pub fn max_date() -> DateTime<Utc> {
    fixed_instant(MAX_DATE_MS)
}

/// UTC midnight at the start of the given calendar day
pub fn utc_midnight(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| OrreryError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
}

/// Parse a `YYYY-MM-DD` calendar date as UTC midnight
pub fn parse_calendar_date(text: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| OrreryError::InvalidDate(format!("{text}: {e}")))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| OrreryError::InvalidDate(text.to_string()))
}

/// Parse either an RFC 3339 timestamp or a `YYYY-MM-DD` calendar date
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => parse_calendar_date(text),
    }
}

/// Format the calendar date of a UTC instant as `YYYY-MM-DD`
pub fn format_calendar_date(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Format a Julian date the way the date panel shows it
pub fn format_julian_date(jd: f64) -> String {
    format!("JD: {:.2}", jd)
}
