//! Time - Wire Formats and Day Ranges
//!
//! The backend mixes two time-bound conventions: the measurement list takes
//! naive wall-clock strings in its own fixed zone, the measured-radiation
//! endpoint takes zoned UTC strings. [`TimeBound`] keeps the two apart.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a backend timestamp
///
/// RFC 3339 strings keep their offset; strings without a zone are UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a pre-localized timestamp, keeping its wall clock
///
/// Strings without a zone keep their wall clock under a zero offset.
pub fn parse_zoned(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

pub fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub fn deserialize_opt_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_instant(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}

pub fn deserialize_opt_zoned<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_zoned(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}

/// A time bound as it goes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    /// Wall clock in the backend zone, serialized without zone suffix
    NaiveLocal(NaiveDateTime),
    /// Instant serialized as ISO-8601 UTC with `Z`
    Utc(DateTime<Utc>),
}

impl TimeBound {
    pub fn to_query_value(&self) -> String {
        match self {
            TimeBound::NaiveLocal(naive) => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
            TimeBound::Utc(instant) => instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}

/// Query window covering one calendar day in the backend zone
///
/// Start is local midnight. End is the last millisecond of the day, or `now`
/// when `date` is today so the query never asks for future samples.
pub fn day_range(date: NaiveDate, now: DateTime<Utc>, tz: Tz) -> (TimeBound, TimeBound) {
    let start = date.and_time(NaiveTime::MIN);
    let local_now = now.with_timezone(&tz).naive_local();

    let end = if local_now.date() == date {
        local_now
    } else {
        start + Duration::days(1) - Duration::milliseconds(1)
    };

    (TimeBound::NaiveLocal(start), TimeBound::NaiveLocal(end))
}

/// Whole UTC day `[date 00:00Z, date+1 00:00Z]`
pub fn utc_day_range(date: NaiveDate) -> (TimeBound, TimeBound) {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    (TimeBound::Utc(start), TimeBound::Utc(start + Duration::days(1)))
}

/// Today's date in the backend zone
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| Error::Invalid {
        message: format!("invalid date '{raw}': {e}"),
    })
}

/// Parse an IANA zone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|e| Error::Invalid {
        message: format!("invalid timezone '{name}': {e}"),
    })
}

/// Hour and minute of a time label
///
/// Accepts `HH:MM`, `HH:MM:SS`, `YYYY-MM-DDTHH:MM...` and `MM-DD HH:MM`.
pub fn label_time_of_day(label: &str) -> Option<(u32, u32)> {
    let label = label.trim();
    let time_part = label
        .rsplit(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(label);

    let mut parts = time_part.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.get(..2)?.parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

/// Hour and minute of an instant as seen in `tz`
pub fn instant_time_of_day(instant: DateTime<Utc>, tz: Tz) -> (u32, u32) {
    let local = instant.with_timezone(&tz);
    (local.hour(), local.minute())
}

/// Milliseconds until the next top of the hour
pub fn until_next_hour<T: TimeZone>(now: DateTime<T>) -> std::time::Duration {
    let into_hour = Duration::minutes(i64::from(now.minute()))
        + Duration::seconds(i64::from(now.second()))
        + Duration::nanoseconds(i64::from(now.nanosecond() % 1_000_000_000));
    (Duration::hours(1) - into_hour)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(3600))
}
