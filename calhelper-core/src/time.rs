//! Date helpers for calendar APIs.
//!
//! Timed events are sent as RFC3339 (`2025-03-20T15:00:00+00:00`), all-day
//! events as `YYYY-MM-DD`, and recurrence-rule dates as RFC2445
//! (`20250320T150000Z`).
//!
//! All-day end dates are exclusive on the API side: an event covering
//! January 1st to 3rd must be sent with an end of January 4th. Passing
//! `is_end = true` together with `all_day = true` adds that day.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CalendarError, CalendarResult};
use crate::event::EventTime;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// A date as callers hand it in: a Unix timestamp or a free-form string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Timestamp(i64),
    Text(String),
}

impl DateInput {
    /// Classify raw user input.
    ///
    /// Integer strings become timestamps, except eight-digit strings that
    /// form a valid `YYYYMMDD` date.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        if s.len() == 8 && NaiveDate::parse_from_str(s, "%Y%m%d").is_ok() {
            return DateInput::Text(s.to_string());
        }

        match s.parse::<i64>() {
            Ok(ts) if is_valid_timestamp(s) => DateInput::Timestamp(ts),
            _ => DateInput::Text(s.to_string()),
        }
    }
}

impl From<i64> for DateInput {
    fn from(ts: i64) -> Self {
        DateInput::Timestamp(ts)
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::parse(s)
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        DateInput::parse(&s)
    }
}

/// Whether `s` is an integer Unix timestamp that fits in an i64.
pub fn is_valid_timestamp(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);

    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && s.parse::<i64>().is_ok()
}

/// Resolve a `DateInput` to an instant. Naive inputs are read in `tz`.
pub fn parse_date_input(input: &DateInput, tz: Tz, now: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
    match input {
        DateInput::Timestamp(ts) => DateTime::<Utc>::from_timestamp(*ts, 0)
            .ok_or_else(|| CalendarError::InvalidDate(ts.to_string())),
        DateInput::Text(s) => parse_text(s, tz, now),
    }
}

fn parse_text(s: &str, tz: Tz, now: DateTime<Utc>) -> CalendarResult<DateTime<Utc>> {
    let s = s.trim();
    let invalid = || CalendarError::InvalidDate(s.to_string());

    let today = now.with_timezone(&tz).date_naive();
    match s.to_ascii_lowercase().as_str() {
        "now" => return Ok(now),
        "today" => return local_midnight(today, tz).ok_or_else(invalid),
        "tomorrow" => {
            return today
                .succ_opt()
                .and_then(|d| local_midnight(d, tz))
                .ok_or_else(invalid);
        }
        "yesterday" => {
            return today
                .pred_opt()
                .and_then(|d| local_midnight(d, tz))
                .ok_or_else(invalid);
        }
        _ => {}
    }

    if let Some(offset) = s.strip_prefix('+') {
        return Ok(now + relative(offset).ok_or_else(invalid)?);
    }
    if let Some(offset) = s.strip_prefix('-') {
        return Ok(now - relative(offset).ok_or_else(invalid)?);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // RFC2445 UTC form
    if let Some(naive) = s.strip_suffix('Z') {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y%m%dT%H%M%S") {
            return Ok(dt.and_utc());
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return tz
                .from_local_datetime(&dt)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(invalid);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return local_midnight(d, tz).ok_or_else(invalid);
        }
    }

    Err(invalid())
}

fn relative(offset: &str) -> Option<Duration> {
    let std = humantime::parse_duration(offset.trim()).ok()?;
    Duration::from_std(std).ok()
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn all_day_date(dt: DateTime<Utc>, tz: Tz, is_end: bool) -> CalendarResult<NaiveDate> {
    let date = dt.with_timezone(&tz).date_naive();

    if is_end {
        date.succ_opt()
            .ok_or_else(|| CalendarError::InvalidDate(date.to_string()))
    } else {
        Ok(date)
    }
}

/// Format a date for an event start/end, in UTC.
///
/// ```
/// use calhelper_core::time::str_to_rfc3339;
///
/// assert_eq!(str_to_rfc3339(0i64, false, false).unwrap(), "1970-01-01T00:00:00+00:00");
/// assert_eq!(str_to_rfc3339("2025-01-03", true, true).unwrap(), "2025-01-04");
/// ```
pub fn str_to_rfc3339(input: impl Into<DateInput>, all_day: bool, is_end: bool) -> CalendarResult<String> {
    str_to_rfc3339_in(input, all_day, is_end, Tz::UTC)
}

/// Like [`str_to_rfc3339`], rendered in `tz`.
pub fn str_to_rfc3339_in(
    input: impl Into<DateInput>,
    all_day: bool,
    is_end: bool,
    tz: Tz,
) -> CalendarResult<String> {
    format_rfc3339(&input.into(), all_day, is_end, tz, Utc::now())
}

fn format_rfc3339(
    input: &DateInput,
    all_day: bool,
    is_end: bool,
    tz: Tz,
    now: DateTime<Utc>,
) -> CalendarResult<String> {
    let dt = parse_date_input(input, tz, now)?;

    if all_day {
        Ok(all_day_date(dt, tz, is_end)?.format("%Y-%m-%d").to_string())
    } else {
        Ok(dt
            .with_timezone(&tz)
            .to_rfc3339_opts(SecondsFormat::Secs, false))
    }
}

/// Format a date for use inside a recurrence rule (`YYYYMMDDTHHMMSSZ`).
pub fn str_to_rfc2445(input: impl Into<DateInput>) -> CalendarResult<String> {
    let dt = parse_date_input(&input.into(), Tz::UTC, Utc::now())?;
    Ok(dt.format("%Y%m%dT%H%M%SZ").to_string())
}

/// Build an `EventTime` from user input, with the same all-day end rule.
pub fn event_time(input: &DateInput, all_day: bool, is_end: bool, tz: Tz) -> CalendarResult<EventTime> {
    let dt = parse_date_input(input, tz, Utc::now())?;

    if all_day {
        Ok(EventTime::Date(all_day_date(dt, tz, is_end)?))
    } else {
        Ok(EventTime::DateTime(dt))
    }
}

/// Set the UNTIL part of a recurrence rule, dropping any COUNT.
///
/// The result always carries the `RRULE:` prefix.
pub fn with_until(rrule: &str, until: impl Into<DateInput>) -> CalendarResult<String> {
    let until = str_to_rfc2445(until)?;
    let body = rrule.trim().strip_prefix("RRULE:").unwrap_or(rrule.trim());

    let mut parts: Vec<&str> = body
        .split(';')
        .filter(|p| !p.is_empty())
        .filter(|p| !p.starts_with("UNTIL=") && !p.starts_with("COUNT="))
        .collect();

    let until_part = format!("UNTIL={}", until);
    parts.push(&until_part);

    Ok(format!("RRULE:{}", parts.join(";")))
}
