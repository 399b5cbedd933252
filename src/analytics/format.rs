//! Display helpers shared by the terminal and browser renderers.

use chrono::{DateTime, TimeZone, Utc};

/// Placeholder for a value that is absent
pub const DASH: &str = "--";

/// `12.5` → `"12 min 30 sec"`
pub fn dwell_duration(minutes: f64) -> String {
    let total = (minutes * 60.0).round() as i64;
    format!("{} min {} sec", total / 60, total % 60)
}

/// Dwell cell in the visitor log; absent or zero renders as a dash
pub fn dwell_cell(minutes: Option<f64>) -> String {
    match minutes {
        Some(m) if m > 0.0 => dwell_duration(m),
        _ => DASH.to_string(),
    }
}

/// `HH:MM` from a backend local timestamp `YYYY-MM-DD HH:MM:SS`
pub fn clock_time(local: &str) -> Option<String> {
    let time = local.split_whitespace().nth(1)?;
    Some(time.chars().take(5).collect())
}

/// Initials for the avatar fallback: `"Jane Mary Doe"` → `"JMD"`
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect()
}

/// `hh:mm AM/PM` in the viewer's zone, used for chart axes and "last updated"
pub fn short_time<Tz: TimeZone>(utc_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::<Utc>::from_timestamp_millis(utc_ms)
        .map(|dt| dt.with_timezone(tz).format("%I:%M %p").to_string())
        .unwrap_or_else(|| DASH.to_string())
}

/// Full local date and time, used on alert cards
pub fn date_time<Tz: TimeZone>(utc: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    utc.with_timezone(tz).format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
