//! Measurement - Irradiance and Temperature Samples

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::utils::time::{deserialize_instant, deserialize_opt_zoned};

/// One timestamped sample from a system
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Measurement {
    pub system_id: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
    /// Wall-clock time already localized by the backend
    #[serde(default, deserialize_with = "deserialize_opt_zoned")]
    pub local_time: Option<DateTime<FixedOffset>>,
    /// Total irradiance (W/m²)
    #[serde(default)]
    pub irradiance: Option<f64>,
    /// Module temperature (°C)
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Measurement {
    /// Wall clock used for labels and the table, in the backend zone
    ///
    /// The backend's own localization wins; otherwise the UTC timestamp is
    /// shifted into `tz`.
    pub fn wall_clock(&self, tz: Tz) -> DateTime<FixedOffset> {
        self.local_time
            .unwrap_or_else(|| self.timestamp.with_timezone(&tz).fixed_offset())
    }

    /// Chart label, e.g. "02-03 15:00"
    pub fn chart_label(&self, tz: Tz) -> String {
        self.wall_clock(tz).format("%m-%d %H:%M").to_string()
    }
}

/// Measured radiation sample used to overlay the forecast chart
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeasuredRadiation {
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub irradiance: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_zoned")]
    pub local_time: Option<DateTime<FixedOffset>>,
}

/// Sort in place by timestamp, oldest first; equal timestamps keep input order
pub fn sort_by_timestamp(measurements: &mut [Measurement]) {
    measurements.sort_by_key(|m| m.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_timezone;

    #[test]
    fn test_deserialize_and_label() {
        let json = r#"[
            {"id":1,"system_id":"PV-001","timestamp":"2026-02-03T07:01:00","local_time":"2026-02-03T15:01:00+08:00","irradiance":512.3,"temperature":null,"created_at":"2026-02-03T07:01:02"},
            {"id":2,"system_id":"PV-001","timestamp":"2026-02-03T07:00:00","irradiance":500.0}
        ]"#;
        let mut rows: Vec<Measurement> = serde_json::from_str(json).expect("rows");
        sort_by_timestamp(&mut rows);

        let tz = parse_timezone("Asia/Shanghai").expect("tz");
        assert_eq!(rows[0].chart_label(tz), "02-03 15:00");
        assert_eq!(rows[1].chart_label(tz), "02-03 15:01");
        assert_eq!(rows[1].temperature, None);
    }
}
