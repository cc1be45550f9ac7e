//! Config - Application Configuration

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CURRENT_POLL_SECS, DEFAULT_BACKEND_TIMEZONE, DEFAULT_BASE_URL, FORECAST_DAYS,
    FORECAST_POLL_SECS, LIST_LIMIT, MEASUREMENT_LIMIT, PAGE_SIZE, REQUEST_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::utils::time::parse_timezone;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection
    pub backend: BackendConfig,
    /// Table and query sizes
    pub viewer: ViewerConfig,
    /// Dashboard refresh cadence
    pub poll: PollConfig,
    /// Forecast options
    pub weather: WeatherConfig,
    /// Logging
    pub log: LogConfig,
    /// UI language ("zh" or "en"); detected from the OS when unset
    pub locale: Option<String>,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL, e.g. "http://127.0.0.1:8000"
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// IANA zone the backend stores naive timestamps in
    pub timezone: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
            timezone: DEFAULT_BACKEND_TIMEZONE.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

/// Table and query sizes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub page_size: usize,
    pub list_limit: usize,
    pub measurement_limit: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            list_limit: LIST_LIMIT,
            measurement_limit: MEASUREMENT_LIMIT,
        }
    }
}

/// Dashboard refresh cadence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    /// Current-conditions period
    pub current_interval_secs: u64,
    /// Forecast period after the first top-of-hour fetch
    pub forecast_interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            current_interval_secs: CURRENT_POLL_SECS,
            forecast_interval_secs: FORECAST_POLL_SECS,
        }
    }
}

impl PollConfig {
    pub fn current_interval(&self) -> Duration {
        Duration::from_secs(self.current_interval_secs.max(1))
    }

    pub fn forecast_interval(&self) -> Duration {
        Duration::from_secs(self.forecast_interval_secs.max(1))
    }
}

/// Forecast options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    /// Forecast horizon (1 or 2)
    pub forecast_days: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_days: FORECAST_DAYS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Directory for daily rolling log files; stderr only when unset
    pub directory: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
        }
    }
}
