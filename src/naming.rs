//! Report title and output filename derivation

use crate::run::{is_truthy, TestRun};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde_json::Value;

/// Used when the run has no name
pub const UNNAMED: &str = "未命名";
/// Used when `startedAt` is missing or unparseable
pub const NO_DATE: &str = "—";
/// Used when a filename part sanitizes to nothing
pub const FALLBACK_FILE_STEM: &str = "report";

const FILENAME_PUNCTUATION: [char; 6] = [' ', '-', '_', '(', ')', '.'];
const TRIMMED_EDGES: [char; 3] = [' ', '.', '_'];

/// The run's display name, or the placeholder
pub fn display_name(run: &TestRun) -> String {
    match run.name() {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(v) if is_truthy(v) => v.to_string(),
        _ => UNNAMED.to_string(),
    }
}

/// Parse an ISO-8601 timestamp and return its calendar date.
///
/// Accepts extended (`2024-03-05T10:00:00.123+08:00`) and basic
/// (`20240305T100000Z`) forms, any single character between date and time,
/// hour or minute precision, and `Z`, `±HH`, `±HHMM` or `±HH:MM` offsets.
/// The date is taken in the timestamp's own offset.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let (date, time) = split_date_time(s)?;
    let date = parse_calendar_date(date)?;
    match time {
        Some(t) => is_valid_time(t).then_some(date),
        None => Some(date),
    }
}

fn split_date_time(s: &str) -> Option<(&str, Option<&str>)> {
    let date_len = if s.as_bytes().get(4) == Some(&b'-') { 10 } else { 8 };
    let date = s.get(..date_len)?;
    let rest = &s[date_len..];
    let mut chars = rest.chars();
    match chars.next() {
        None => Some((date, None)),
        Some(_) => Some((date, Some(chars.as_str()))),
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if s.len() == 8 && all_digits(s) {
        let extended = format!("{}-{}-{}", &s[..4], &s[4..6], &s[6..]);
        return NaiveDate::parse_from_str(&extended, "%Y-%m-%d").ok();
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `HH`, `HHMM`, `HHMMSS` or their colon forms, split into two-digit fields
fn clock_fields(s: &str) -> Option<Vec<u32>> {
    let parts: Vec<&str> = if s.contains(':') {
        s.split(':').collect()
    } else if s.len() % 2 == 0 {
        (0..s.len()).step_by(2).filter_map(|i| s.get(i..i + 2)).collect()
    } else {
        return None;
    };
    if parts.is_empty() || parts.len() > 3 || !parts.iter().all(|p| p.len() == 2 && all_digits(p)) {
        return None;
    }
    parts.iter().map(|p| p.parse().ok()).collect()
}

/// Strip a trailing UTC offset, rejecting malformed ones
fn strip_offset(t: &str) -> Option<&str> {
    if let Some(clock) = t.strip_suffix('Z') {
        return Some(clock);
    }
    let Some(i) = t.rfind(&['+', '-'][..]) else {
        return Some(t);
    };
    let fields = clock_fields(&t[i + 1..])?;
    let secs = fields.iter().fold(0i32, |acc, f| acc * 60 + *f as i32)
        * 60i32.pow(3 - fields.len() as u32);
    let minutes_ok = fields.get(1).map_or(true, |m| *m < 60);
    FixedOffset::east_opt(secs)
        .filter(|_| minutes_ok)
        .map(|_| &t[..i])
}

fn is_valid_time(t: &str) -> bool {
    let Some(clock) = strip_offset(t) else {
        return false;
    };
    let (hms, fraction) = match clock.find(&['.', ','][..]) {
        Some(i) => (&clock[..i], Some(&clock[i + 1..])),
        None => (clock, None),
    };
    if fraction.is_some_and(|f| !all_digits(f)) {
        return false;
    }
    match clock_fields(hms).as_deref() {
        Some([h]) => NaiveTime::from_hms_opt(*h, 0, 0).is_some(),
        Some([h, m]) => NaiveTime::from_hms_opt(*h, *m, 0).is_some(),
        Some([h, m, sec]) => NaiveTime::from_hms_opt(*h, *m, *sec).is_some(),
        _ => false,
    }
}

/// `YYYY-MM-DD` from `startedAt`, or the placeholder
pub fn date_string(run: &TestRun) -> String {
    run.started_at()
        .filter(|s| !s.is_empty())
        .and_then(parse_iso_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// `"{name} - {date}"`
pub fn report_title(name: &str, date: &str) -> String {
    format!("{} - {}", name, date)
}

/// Replace anything outside alphanumerics and ` -_().` with `_`, then trim
/// spaces, dots and underscores from both ends.
pub fn sanitize_filename(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || FILENAME_PUNCTUATION.contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(&TRIMMED_EDGES[..]);
    if trimmed.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `"{safe_name} - {safe_date}.html"`
pub fn file_name(name: &str, date: &str) -> String {
    format!("{} - {}.html", sanitize_filename(name), sanitize_filename(date))
}

/// Title and filename derived together from one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNames {
    pub name: String,
    pub date: String,
    pub title: String,
    pub file_name: String,
}

impl ReportNames {
    pub fn derive(run: &TestRun) -> Self {
        let name = display_name(run);
        let date = date_string(run);
        Self {
            title: report_title(&name, &date),
            file_name: file_name(&name, &date),
            name,
            date,
        }
    }
}
