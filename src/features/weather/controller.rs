//! Weather Controller
//!
//! Current conditions, the first forecast day and the measured-radiation
//! overlay for the selected system.
//!
//! Fetching and applying are separate steps: a [`WeatherFetcher`] runs
//! without borrowing the controller, and its result is applied only if the
//! token it was started with still matches the selection.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::components::chart::{
    ChartRenderer, ChartSlot, ChartSpec, PrimarySeries, Sample, SecondarySeries, TimedValue, align,
};
use crate::constants::{CANVAS_RADIATION, CANVAS_TEMPERATURE};
use crate::domain::config::{ViewerConfig, WeatherConfig};
use crate::domain::measurement::MeasuredRadiation;
use crate::domain::system::System;
use crate::domain::weather::{CurrentWeather, Forecast, ForecastSample};
use crate::error::{Error, Result};
use crate::i18n::{Locale, t, t_with};
use crate::services::api::{ApiClient, SystemQuery};
use crate::services::transport::HttpTransport;
use crate::state::{FetchToken, NoticeState, Selection};
use crate::utils::format::{format_or_zero, format_updated_at};
use crate::utils::time::{instant_time_of_day, parse_date, utc_day_range};

/// Current-conditions card, formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub system_id: String,
    pub radiation: String,
    pub cloud_cover: String,
    pub temperature: String,
    pub wind_speed: String,
    pub updated_at: String,
}

impl CurrentConditions {
    pub fn from_weather(weather: &CurrentWeather, tz: Tz) -> Self {
        Self {
            system_id: weather.system_id.clone(),
            radiation: format_or_zero(weather.shortwave_radiation, 1),
            cloud_cover: format_or_zero(weather.cloud_cover, 0),
            temperature: format_or_zero(weather.temperature_2m, 1),
            wind_speed: format_or_zero(weather.wind_speed_10m, 1),
            updated_at: format_updated_at(&weather.fetched_at, tz),
        }
    }
}

/// A forecast plus the measured radiation of its first day
#[derive(Debug)]
pub struct ForecastBundle {
    pub forecast: Forecast,
    /// Failure here never blocks the forecast charts
    pub measured: Result<Vec<MeasuredRadiation>>,
}

/// Fetches for one system; cheap to clone and `Send` for spawning
pub struct WeatherFetcher<T: HttpTransport> {
    api: ApiClient<T>,
    forecast_days: u32,
}

impl<T: HttpTransport> Clone for WeatherFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            forecast_days: self.forecast_days,
        }
    }
}

impl<T: HttpTransport> WeatherFetcher<T> {
    pub async fn current(&self, system_id: &str) -> Result<CurrentWeather> {
        self.api.current_weather(system_id).await
    }

    /// Forecast, then measured radiation for the whole UTC day of its first sample
    pub async fn forecast(&self, system_id: &str) -> Result<ForecastBundle> {
        let forecast = self.api.forecast(system_id, self.forecast_days).await?;

        let first_date = forecast
            .first_day()
            .first()
            .map(|sample| parse_date(sample.date()));
        let measured = match first_date {
            Some(Ok(date)) => {
                let (start, end) = utc_day_range(date);
                self.api.measured_radiation(system_id, start, end).await
            }
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        };

        Ok(ForecastBundle { forecast, measured })
    }
}

/// Weather dashboard controller
pub struct WeatherController<T: HttpTransport, R: ChartRenderer> {
    api: ApiClient<T>,
    renderer: R,
    tz: Tz,
    locale: Locale,
    list_limit: usize,
    forecast_days: u32,
    systems: Vec<System>,
    selection: Selection,
    current: Option<CurrentConditions>,
    forecast_updated: Option<String>,
    pub notices: NoticeState,
    radiation_chart: ChartSlot<R::Handle>,
    temperature_chart: ChartSlot<R::Handle>,
}

impl<T: HttpTransport, R: ChartRenderer> WeatherController<T, R> {
    pub fn new(
        api: ApiClient<T>,
        renderer: R,
        tz: Tz,
        locale: Locale,
        viewer: &ViewerConfig,
        weather: &WeatherConfig,
    ) -> Self {
        Self {
            api,
            renderer,
            tz,
            locale,
            list_limit: viewer.list_limit,
            forecast_days: weather.forecast_days,
            systems: Vec::new(),
            selection: Selection::default(),
            current: None,
            forecast_updated: None,
            notices: NoticeState::default(),
            radiation_chart: ChartSlot::new(CANVAS_RADIATION),
            temperature_chart: ChartSlot::new(CANVAS_TEMPERATURE),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    pub fn current(&self) -> Option<&CurrentConditions> {
        self.current.as_ref()
    }

    pub fn forecast_updated(&self) -> Option<&str> {
        self.forecast_updated.as_deref()
    }

    pub fn fetcher(&self) -> WeatherFetcher<T> {
        WeatherFetcher {
            api: self.api.clone(),
            forecast_days: self.forecast_days,
        }
    }

    /// Load the selectable systems and select the first one
    pub async fn load_systems(&mut self) -> Result<()> {
        let query = SystemQuery {
            limit: self.list_limit,
            is_active: None,
        };
        match self.api.list_systems(query).await {
            Ok(systems) => {
                tracing::info!("Loaded {} systems", systems.len());
                self.systems = systems;
                match self.systems.first().map(|s| s.system_id.clone()) {
                    Some(first) => {
                        self.select(&first);
                    }
                    None => {
                        self.selection.clear();
                        self.notices.warn(t(self.locale, "table-no-systems"));
                    }
                }
                Ok(())
            }
            Err(e) => {
                self.notices
                    .error(t_with(self.locale, "table-load-failed", &[("error", &e.to_string())]));
                Err(e)
            }
        }
    }

    /// The selected system
    pub fn selected(&self) -> Option<&System> {
        let id = self.selection.system_id()?;
        self.systems.iter().find(|s| s.system_id == id)
    }

    /// Switch to a known system; displays are cleared until new data arrives
    pub fn select(&mut self, system_id: &str) -> Option<FetchToken> {
        if !self.systems.iter().any(|s| s.system_id == system_id) {
            self.notices
                .warn(format!("{}: {}", t(self.locale, "weather-select-system"), system_id));
            return None;
        }
        self.current = None;
        self.forecast_updated = None;
        self.radiation_chart.clear(&mut self.renderer);
        self.temperature_chart.clear(&mut self.renderer);
        Some(self.selection.select(system_id))
    }

    /// Token and id for a refresh of the current selection
    pub fn refresh_target(&self) -> Option<(FetchToken, String)> {
        self.selection
            .token()
            .map(|(token, id)| (token, id.to_string()))
    }

    /// Apply a current-conditions result; false if it was stale
    pub fn apply_current(&mut self, token: FetchToken, result: Result<CurrentWeather>) -> bool {
        if !self.selection.accepts(token) {
            tracing::debug!("Dropping stale current conditions");
            return false;
        }
        match result {
            Ok(weather) => {
                self.current = Some(CurrentConditions::from_weather(&weather, self.tz));
            }
            Err(e) => {
                self.notices.error(t_with(
                    self.locale,
                    "notice-request-failed",
                    &[("error", &e.to_string())],
                ));
            }
        }
        true
    }

    /// Apply a forecast result and redraw both charts; false if it was stale
    pub fn apply_forecast(
        &mut self,
        token: FetchToken,
        result: Result<ForecastBundle>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.selection.accepts(token) {
            tracing::debug!("Dropping stale forecast");
            return false;
        }
        let bundle = match result {
            Ok(bundle) => bundle,
            Err(e) => {
                self.notices.error(t_with(
                    self.locale,
                    "notice-request-failed",
                    &[("error", &e.to_string())],
                ));
                return true;
            }
        };

        let measured = match bundle.measured {
            Ok(measured) => measured,
            Err(e) => {
                self.notices.warn(t_with(
                    self.locale,
                    "weather-measured-unavailable",
                    &[("error", &e.to_string())],
                ));
                Vec::new()
            }
        };

        let (radiation, temperature) = self.forecast_charts(&bundle.forecast.first_day(), &measured);
        self.radiation_chart.render(&mut self.renderer, &radiation);
        self.temperature_chart.render(&mut self.renderer, &temperature);

        let fetched_at = bundle.forecast.fetched_at.unwrap_or(now);
        self.forecast_updated = Some(format_updated_at(&fetched_at, self.tz));
        true
    }

    /// Radiation chart (forecast with measured overlay) and temperature chart
    pub fn forecast_charts(
        &self,
        day: &[ForecastSample],
        measured: &[MeasuredRadiation],
    ) -> (ChartSpec, ChartSpec) {
        let forecast_radiation = PrimarySeries {
            name: t(self.locale, "chart-forecast-radiation"),
            samples: day
                .iter()
                .map(|s| Sample::new(s.hour_label(), s.shortwave_radiation))
                .collect(),
        };
        let measured_radiation = SecondarySeries {
            name: t(self.locale, "chart-measured-radiation"),
            samples: measured
                .iter()
                .map(|m| TimedValue {
                    time: match m.local_time {
                        Some(local) => (local.hour(), local.minute()),
                        None => instant_time_of_day(m.timestamp, self.tz),
                    },
                    value: m.irradiance,
                })
                .collect(),
        };
        let air_temperature = PrimarySeries {
            name: t(self.locale, "chart-air-temperature"),
            samples: day
                .iter()
                .map(|s| Sample::new(s.hour_label(), s.temperature_2m))
                .collect(),
        };

        (
            ChartSpec {
                unit: "W/m²",
                data: align(&forecast_radiation, &[measured_radiation]),
            },
            ChartSpec {
                unit: "°C",
                data: align(&air_temperature, &[]),
            },
        )
    }

    pub async fn refresh_current(&mut self) -> bool {
        let Some((token, system_id)) = self.refresh_target() else {
            return false;
        };
        let result = self.fetcher().current(&system_id).await;
        self.apply_current(token, result)
    }

    pub async fn refresh_forecast(&mut self) -> bool {
        let Some((token, system_id)) = self.refresh_target() else {
            return false;
        };
        let result = self.fetcher().forecast(&system_id).await;
        self.apply_forecast(token, result, Utc::now())
    }

    /// Current-conditions card as text
    pub fn render_current(&self) -> String {
        let locale = self.locale;
        let Some(current) = &self.current else {
            return t(locale, "table-loading");
        };
        let title = self
            .selected()
            .map_or(current.system_id.clone(), System::option_label);
        format!(
            "☀️ {}\n  {}: {} W/m²   {}: {} %   {}: {} °C   {}: {} km/h\n  {}: {}",
            title,
            t(locale, "weather-radiation"),
            current.radiation,
            t(locale, "weather-cloud-cover"),
            current.cloud_cover,
            t(locale, "weather-temperature"),
            current.temperature,
            t(locale, "weather-wind-speed"),
            current.wind_speed,
            t(locale, "weather-updated"),
            current.updated_at
        )
    }

    /// Require a selection before a one-shot command
    pub fn ensure_selected(&self) -> Result<()> {
        if self.selection.system_id().is_none() {
            return Err(Error::Validation {
                message: t(self.locale, "weather-select-system"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::chart::slot::testing::CountingRenderer;
    use crate::services::transport::testing::RecordingTransport;
    use crate::utils::time::{parse_instant, parse_timezone};
    use reqwest::Method;

    const SYSTEMS: &str = r#"[
        {"system_id":"PV-001","name":"Roof"},
        {"system_id":"PV-002","name":"Carport"}
    ]"#;

    const FORECAST: &str = r#"{
        "system_id":"PV-001","days":2,"fetched_at":"2026-02-04T01:00:12",
        "hourly":{
            "time":["2026-02-04T00:00","2026-02-04T01:00","2026-02-04T02:00","2026-02-05T00:00"],
            "shortwave_radiation":[0.0,120.0,340.5,0.0],
            "temperature_2m":[3.0,4.5,6.0,2.0]
        }
    }"#;

    fn controller(transport: RecordingTransport) -> WeatherController<RecordingTransport, CountingRenderer> {
        WeatherController::new(
            ApiClient::new(transport),
            CountingRenderer::default(),
            parse_timezone("Asia/Shanghai").expect("tz"),
            Locale::ZhCN,
            &ViewerConfig::default(),
            &WeatherConfig::default(),
        )
    }

    fn transport() -> RecordingTransport {
        let transport = RecordingTransport::new();
        transport.reply(Method::GET, "/systems/", 200, SYSTEMS);
        transport.reply(
            Method::GET,
            "/weather/current_cached",
            200,
            r#"{"system_id":"PV-001","fetched_at":"2026-02-04T01:05:00","shortwave_radiation":512.34,"cloud_cover":null,"temperature_2m":21.46,"wind_speed_10m":3.0}"#,
        );
        transport.reply(Method::GET, "/weather/forecast_cached", 200, FORECAST);
        transport
    }

    #[tokio::test]
    async fn test_current_conditions_format() {
        let mut ctl = controller(transport());
        ctl.load_systems().await.expect("systems");
        assert_eq!(ctl.selected().map(|s| s.system_id.as_str()), Some("PV-001"));

        assert!(ctl.refresh_current().await);
        let current = ctl.current().expect("current");
        assert_eq!(current.radiation, "512.3");
        assert_eq!(current.cloud_cover, "0");
        assert_eq!(current.temperature, "21.5");
        assert_eq!(current.wind_speed, "3.0");
        assert_eq!(current.updated_at, "2026-02-04 09:05");
        assert!(ctl.render_current().contains("Roof (PV-001)"));

        let sent = ctl.api.transport().requests();
        assert_eq!(sent[1].query, vec![("system_id".to_string(), "PV-001".to_string())]);
    }

    #[tokio::test]
    async fn test_forecast_with_measured_overlay() {
        let transport = transport();
        transport.reply(
            Method::GET,
            "/weather/measured_radiation",
            200,
            r#"[
                {"timestamp":"2026-02-03T17:00:00Z","irradiance":100.0},
                {"timestamp":"2026-02-04T01:00:00+08:00","irradiance":90.0,"local_time":"2026-02-04T01:00:00+08:00"},
                {"timestamp":"2026-02-03T18:30:00Z","irradiance":250.0}
            ]"#,
        );
        let mut ctl = controller(transport);
        ctl.load_systems().await.expect("systems");
        assert!(ctl.refresh_forecast().await);

        let renderer = ctl.renderer();
        assert_eq!(renderer.live_on(CANVAS_RADIATION), 1);
        assert_eq!(renderer.live_on(CANVAS_TEMPERATURE), 1);

        let radiation = &renderer.created[0].data;
        assert_eq!(radiation.labels, vec!["00:00", "01:00", "02:00"]);
        assert_eq!(
            radiation.values("实测辐射 (W/m²)"),
            Some(&[None, Some(100.0), None][..])
        );
        assert_eq!(
            radiation.values("预报辐射 (W/m²)"),
            Some(&[Some(0.0), Some(120.0), Some(340.5)][..])
        );
        assert_eq!(ctl.forecast_updated(), Some("2026-02-04 09:00"));

        let measured = ctl
            .api
            .transport()
            .requests()
            .into_iter()
            .find(|r| r.path == "/weather/measured_radiation")
            .expect("measured request");
        assert!(measured.query.contains(&("start_time".to_string(), "2026-02-04T00:00:00.000Z".to_string())));
        assert!(measured.query.contains(&("end_time".to_string(), "2026-02-05T00:00:00.000Z".to_string())));

        let forecast = ctl
            .api
            .transport()
            .requests()
            .into_iter()
            .find(|r| r.path == "/weather/forecast_cached")
            .expect("forecast request");
        assert!(forecast.query.contains(&("days".to_string(), "2".to_string())));
    }

    #[tokio::test]
    async fn test_measured_failure_degrades_to_absent_series() {
        let transport = transport();
        transport.reply(Method::GET, "/weather/measured_radiation", 503, r#"{"detail":"busy"}"#);
        let mut ctl = controller(transport);
        ctl.load_systems().await.expect("systems");
        assert!(ctl.refresh_forecast().await);

        let radiation = &ctl.renderer().created[0].data;
        assert_eq!(radiation.values("实测辐射 (W/m²)"), Some(&[None, None, None][..]));
        assert!(ctl.notices.last().is_some_and(|n| n.message.contains("busy")));
    }

    #[tokio::test]
    async fn test_stale_results_are_dropped() {
        let mut ctl = controller(transport());
        ctl.load_systems().await.expect("systems");

        let (old_token, old_id) = ctl.refresh_target().expect("selected");
        let stale = ctl.fetcher().current(&old_id).await;
        ctl.select("PV-002").expect("known system");

        assert!(!ctl.apply_current(old_token, stale));
        assert!(ctl.current().is_none());
    }

    #[tokio::test]
    async fn test_unknown_system_is_not_selected() {
        let mut ctl = controller(transport());
        ctl.load_systems().await.expect("systems");
        assert!(ctl.select("PV-404").is_none());
        assert_eq!(ctl.selected().map(|s| s.system_id.as_str()), Some("PV-001"));
    }

    #[test]
    fn test_forecast_fallback_to_now() {
        let mut ctl = controller(RecordingTransport::new());
        ctl.systems = serde_json::from_str(SYSTEMS).expect("systems");
        let token = ctl.select("PV-001").expect("token");

        let bundle = ForecastBundle {
            forecast: serde_json::from_str(r#"{"hourly":null}"#).expect("forecast"),
            measured: Ok(Vec::new()),
        };
        let now = parse_instant("2026-02-04T02:30:00Z").expect("now");
        assert!(ctl.apply_forecast(token, Ok(bundle), now));
        assert_eq!(ctl.forecast_updated(), Some("2026-02-04 10:30"));
        // Nothing to draw for an empty forecast
        assert!(ctl.renderer().live.is_empty());
    }
}
