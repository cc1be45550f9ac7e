//! Format - Display Formatting

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

/// Placeholder for an absent value in tables
pub const ABSENT: &str = "--";

/// "Last updated" stamp in the backend zone, e.g. "2026-02-04 09:05"
pub fn format_updated_at(dt: &DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Table and CSV timestamp, e.g. "2026-02-03 15:00:00"
pub fn format_record_time(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Fixed-precision value, `--` when absent
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => ABSENT.to_string(),
    }
}

/// Fixed-precision value, absent shown as zero
pub fn format_or_zero(value: Option<f64>, decimals: usize) -> String {
    format!("{:.decimals$}", value.unwrap_or(0.0))
}

/// Truncate to `max_chars` characters with an ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return s.chars().take(max_chars).collect();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Terminal display width: CJK and emoji count as two columns
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 | 0x1F300..=0x1FAFF => 2,
            _ => 1,
        })
        .sum()
}
