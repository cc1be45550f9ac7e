//! Weather - Current Conditions and Hourly Forecast

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::{deserialize_instant, deserialize_opt_instant};

/// Cached current-conditions snapshot
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CurrentWeather {
    pub system_id: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub fetched_at: DateTime<Utc>,
    /// Shortwave radiation (W/m²)
    #[serde(default)]
    pub shortwave_radiation: Option<f64>,
    /// Cloud cover (%)
    #[serde(default)]
    pub cloud_cover: Option<f64>,
    /// Air temperature at 2 m (°C)
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    /// Wind speed at 10 m (km/h)
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
}

/// Hourly forecast arrays, index-aligned with `time`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HourlyForecast {
    /// Local-time labels such as "2026-02-04T00:00"
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub shortwave_radiation: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
}

/// Cached forecast
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Forecast {
    #[serde(default)]
    pub system_id: Option<String>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hourly: Option<HourlyForecast>,
}

/// One forecast hour
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// Full local-time label
    pub time: String,
    pub shortwave_radiation: Option<f64>,
    pub temperature_2m: Option<f64>,
}

impl ForecastSample {
    /// Date part of the label ("2026-02-04")
    pub fn date(&self) -> &str {
        self.time.split('T').next().unwrap_or(&self.time)
    }

    /// Axis label: the time part after `T` ("00:00"), or the whole label
    pub fn hour_label(&self) -> &str {
        self.time.split_once('T').map_or(self.time.as_str(), |(_, t)| t)
    }
}

impl Forecast {
    /// Samples of the first forecast day only
    ///
    /// The backend returns local-time labels already; no zone conversion is
    /// applied, which would shift the axis.
    pub fn first_day(&self) -> Vec<ForecastSample> {
        let Some(hourly) = &self.hourly else {
            return Vec::new();
        };
        let Some(first) = hourly.time.first() else {
            return Vec::new();
        };
        let day = first.split('T').next().unwrap_or(first).to_string();

        hourly
            .time
            .iter()
            .enumerate()
            .filter(|(_, t)| t.starts_with(&day))
            .map(|(i, t)| ForecastSample {
                time: t.clone(),
                shortwave_radiation: hourly.shortwave_radiation.get(i).copied().flatten(),
                temperature_2m: hourly.temperature_2m.get(i).copied().flatten(),
            })
            .collect()
    }
}
