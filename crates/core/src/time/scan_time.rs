use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Display;

// en-US locale string, e.g. "1/15/2025, 10:30:00 AM".
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Human-readable scan time in the local zone. Values that do not parse are shown as-is.
pub fn format_scan_time(raw: &str) -> String {
    format_scan_time_in(raw, &Local).unwrap_or_else(|| raw.to_string())
}

/// Scanner timestamps without an offset are already local wall-clock times and
/// are shown unchanged; timestamps with an offset are converted into `tz`.
pub fn format_scan_time_in<Tz>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.format(DISPLAY_FORMAT).to_string())
}
