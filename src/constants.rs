//! Console Constants
//!
//! Centralized defaults shared by the config layer and the controllers.

/// Rows per page in every paginated table
pub const PAGE_SIZE: usize = 20;

/// `limit` used to approximate "fetch everything" on list endpoints
pub const LIST_LIMIT: usize = 1000;

/// One sample per minute for a whole day
pub const MEASUREMENT_LIMIT: usize = 1440;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Zone the backend stores and interprets naive timestamps in
pub const DEFAULT_BACKEND_TIMEZONE: &str = "Asia/Shanghai";

/// HTTP request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Current-conditions refresh period
pub const CURRENT_POLL_SECS: u64 = 5 * 60;

/// Forecast refresh period once aligned to the top of the hour
pub const FORECAST_POLL_SECS: u64 = 60 * 60;

/// Forecast horizon requested from the backend
pub const FORECAST_DAYS: u32 = 2;

/// Notices kept in memory
pub const NOTICE_CAPACITY: usize = 500;

/// Default peak sun hours for the daily energy estimate
pub const DEFAULT_PEAK_SUN_HOURS: f64 = 4.0;

/// Default system derate used by the daily energy estimate
pub const DEFAULT_SYSTEM_EFFICIENCY: f64 = 0.85;

/// Canvas identifiers
pub const CANVAS_RADIATION: &str = "radiationChart";
pub const CANVAS_TEMPERATURE: &str = "temperatureChart";
pub const CANVAS_IRRADIANCE: &str = "irradianceChart";
pub const CANVAS_DEVICE_TEMPERATURE: &str = "deviceTemperatureChart";
