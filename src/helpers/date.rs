//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Month name and year, e.g. "Mar 2024"
pub const DISPLAY_DATE_FORMAT: &str = "MMM YYYY";

/// Day and month, e.g. "15 03"
pub const SHORT_DATE_FORMAT: &str = "DD MM";

/// Four-digit year, e.g. "2024"
pub const YEAR_FORMAT: &str = "YYYY";

/// What every formatted field reads when the source date is missing or unparseable
pub const INVALID_DATE: &str = "Invalid date";

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(Some(&date), "MMM YYYY") // -> "Mar 2024"
/// format_date(None, "YYYY")            // -> "Invalid date"
/// ```
pub fn format_date(date: Option<&NaiveDateTime>, format: &str) -> String {
    match date {
        Some(date) => date.format(&moment_to_chrono_format(format)).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Parse a front-matter date string in the formats authors commonly write
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset: keep the wall-clock time the author wrote
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    None
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each category
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute, after MM has been consumed
        ("mm", "%M"),
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
