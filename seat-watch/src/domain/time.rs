//! Time handling for upstream timetable and route data.
//!
//! The upstream API is inconsistent about time formats: timetables give a
//! local time of day as "HH:MM:SS.fff", route searches give full RFC 3339
//! timestamps with an offset, and users type dates as "DD.MM.YYYY". This
//! module normalises all of them into `chrono` values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike};

/// Error returned when parsing an invalid time or date string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a local time of day.
///
/// Accepts "HH:MM", "HH:MM:SS" and "HH:MM:SS.fff" (any number of fraction
/// digits).
///
/// # Examples
///
/// ```
/// use seat_watch::domain::parse_clock;
///
/// let t = parse_clock("10:30:00.000").unwrap();
/// assert_eq!(t.to_string(), "10:30:00");
///
/// assert!(parse_clock("10:30").is_ok());
/// assert!(parse_clock("25:00").is_err());
/// assert!(parse_clock("1030").is_err());
/// ```
pub fn parse_clock(s: &str) -> Result<NaiveTime, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::new("empty time"));
    }

    let format = match s.len() {
        5 => "%H:%M",
        8 => "%H:%M:%S",
        n if n > 9 && s.as_bytes()[8] == b'.' => "%H:%M:%S%.f",
        _ => return Err(TimeError::new("expected HH:MM, HH:MM:SS or HH:MM:SS.fff")),
    };

    NaiveTime::parse_from_str(s, format).map_err(|_| TimeError::new("time out of range"))
}

/// Parse an RFC 3339 timestamp, keeping its UTC offset.
///
/// The offset matters: the time of day at the offset is the local time
/// printed on the ticket, which is what timetables are compared against.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    DateTime::parse_from_rfc3339(s.trim()).map_err(|_| TimeError::new("expected RFC 3339"))
}

/// Parse the local time of day out of an RFC 3339 timestamp.
pub fn local_clock(s: &str) -> Result<NaiveTime, TimeError> {
    parse_timestamp(s).map(|dt| dt.time())
}

/// Parse a calendar date given as "DD.MM.YYYY" or "YYYY-MM-DD".
///
/// # Examples
///
/// ```
/// use seat_watch::domain::parse_date;
///
/// let a = parse_date("15.03.2024").unwrap();
/// let b = parse_date("2024-03-15").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| TimeError::new("expected DD.MM.YYYY or YYYY-MM-DD"))
}

/// Format a date the way it is shown to users ("DD.MM.YYYY").
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Format a date the way the upstream API expects it ("YYYY-MM-DD").
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a time of day as "HH:MM".
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// True when two times of day fall in the same minute.
///
/// Upstream sources disagree on seconds and fractions, so departures are
/// matched at minute precision.
pub fn same_minute(a: NaiveTime, b: NaiveTime) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}
