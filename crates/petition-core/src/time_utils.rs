use chrono::{NaiveDate, NaiveTime, Weekday};
use tracing::trace;

use crate::error::{PetitionError, Result};

// ── Publication-date parsing ──────────────────────────────────────────────────

/// Time-of-day layouts accepted after the `T` (or space) separator, once any
/// UTC designator or offset has been removed.
const TIME_FMTS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Parse an ISO-8601 publication date into a calendar day.
///
/// Accepted date forms, each matched by exact shape:
/// * calendar `YYYY-MM-DD` and the basic form `YYYYMMDD`
/// * week dates `YYYY-Www-D` and `YYYY-Www` (Monday)
/// * ordinal dates `YYYY-DDD`
/// * reduced precision `YYYY-MM` and `YYYY`, resolved to the first day
///
/// A date may be followed by `T` or a space and a time of day, optionally
/// with `Z` or an offset (`+03:00`, `+0300`, `+03`). The calendar day is the
/// one written in the string; no zone conversion happens.
///
/// Surrounding whitespace is ignored. Returns `None` for empty or
/// unrecognised input; this never panics.
pub fn parse_publication_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() || !s.is_ascii() {
        return None;
    }

    let (date_part, time_part) = match s.find(|c: char| c == 'T' || c == ' ') {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let date = calendar_date(date_part);
    let time_ok = time_part.map_or(true, is_time_of_day);
    match date {
        Some(date) if time_ok => Some(date),
        _ => {
            trace!("unparseable publication date {:?}", s);
            None
        }
    }
}

/// Parse a filter bound given as `YYYY-MM-DD`.
///
/// Stricter than [`parse_publication_date`]: bounds come from the user, so a
/// typo is reported instead of silently widening the range.
pub fn parse_filter_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if !trimmed.is_ascii() {
        return Err(PetitionError::InvalidDate(s.to_string()));
    }
    extended_date(trimmed).ok_or_else(|| PetitionError::InvalidDate(s.to_string()))
}

/// All-digit field of any width, parsed into `T`.
fn digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Exactly `YYYY-MM-DD`. Caller guarantees ASCII.
fn extended_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if s.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    NaiveDate::from_ymd_opt(digits(&s[..4])?, digits(&s[5..7])?, digits(&s[8..])?)
}

fn iso_weekday(day: u32) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Date component of an ISO-8601 string, matched by shape. Caller guarantees ASCII.
fn calendar_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    let dashed = s.len() > 4 && b[4] == b'-';
    let week = dashed && s.len() > 5 && b[5] == b'W';

    match s.len() {
        10 if week && b[8] == b'-' => NaiveDate::from_isoywd_opt(
            digits(&s[..4])?,
            digits(&s[6..8])?,
            iso_weekday(digits(&s[9..])?)?,
        ),
        10 => extended_date(s),
        8 if week => NaiveDate::from_isoywd_opt(digits(&s[..4])?, digits(&s[6..])?, Weekday::Mon),
        8 if dashed => NaiveDate::from_yo_opt(digits(&s[..4])?, digits(&s[5..])?),
        8 => NaiveDate::from_ymd_opt(digits(&s[..4])?, digits(&s[4..6])?, digits(&s[6..])?),
        7 if dashed => NaiveDate::from_ymd_opt(digits(&s[..4])?, digits(&s[5..])?, 1),
        4 => NaiveDate::from_ymd_opt(digits(&s[..4])?, 1, 1),
        _ => None,
    }
}

/// Whether `s` is a time of day with an optional `Z` or numeric offset.
fn is_time_of_day(s: &str) -> bool {
    let base = match s.strip_suffix('Z') {
        Some(stripped) => stripped,
        None => match s.rfind(|c: char| c == '+' || c == '-') {
            Some(idx) if is_offset(&s[idx + 1..]) => &s[..idx],
            Some(_) => return false,
            None => s,
        },
    };
    TIME_FMTS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(base, fmt).is_ok())
}

/// `HH`, `HHMM` or `HH:MM` with hours below 24 and minutes below 60.
fn is_offset(s: &str) -> bool {
    let (hours, minutes) = match s.len() {
        2 => (&s[..2], "00"),
        4 => (&s[..2], &s[2..]),
        5 if s.as_bytes()[2] == b':' => (&s[..2], &s[3..]),
        _ => return false,
    };
    matches!(
        (digits::<u32>(hours), digits::<u32>(minutes)),
        (Some(h), Some(m)) if h < 24 && m < 60
    )
}

// ── Period keys ───────────────────────────────────────────────────────────────

/// Calendar-month bucket key, e.g. `"2024-01"`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Calendar-year bucket key, e.g. `"2024"`.
pub fn year_key(date: NaiveDate) -> String {
    date.format("%Y").to_string()
}

// ── Range checks ──────────────────────────────────────────────────────────────

/// Whether `date` lies within the inclusive `[from, to]` day range.
///
/// A `None` bound leaves that side open.
pub fn within_day_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if matches!(from, Some(start) if date < start) {
        return false;
    }
    if matches!(to, Some(end) if date > end) {
        return false;
    }
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
