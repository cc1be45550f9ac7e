//! Measurements Controller
//!
//! One system, one calendar day: fetch, sort, page, chart and export.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::export::export_to_dir;
use crate::components::chart::{ChartRenderer, ChartSlot, ChartSpec, PrimarySeries, Sample, plot_all};
use crate::components::data_table::{Column, DataTable, render_page_selector};
use crate::constants::{CANVAS_DEVICE_TEMPERATURE, CANVAS_IRRADIANCE};
use crate::domain::config::ViewerConfig;
use crate::domain::measurement::{Measurement, sort_by_timestamp};
use crate::error::{Error, Result};
use crate::i18n::{Locale, t, t_with};
use crate::services::api::{ApiClient, MeasurementQuery};
use crate::services::transport::HttpTransport;
use crate::state::{FetchToken, ListState, LoadState, NoticeState, Selection};
use crate::utils::format::{format_record_time, format_value};
use crate::utils::time::day_range;

/// A table row with its 1-based position in the whole day
struct Row<'a> {
    number: usize,
    measurement: &'a Measurement,
}

/// Measurement viewer controller
pub struct MeasurementsController<T: HttpTransport, R: ChartRenderer> {
    api: ApiClient<T>,
    renderer: R,
    tz: Tz,
    locale: Locale,
    limit: usize,
    selection: Selection,
    date: Option<NaiveDate>,
    pub list: ListState<Measurement>,
    pub notices: NoticeState,
    irradiance_chart: ChartSlot<R::Handle>,
    temperature_chart: ChartSlot<R::Handle>,
}

impl<T: HttpTransport, R: ChartRenderer> MeasurementsController<T, R> {
    pub fn new(api: ApiClient<T>, renderer: R, tz: Tz, locale: Locale, viewer: &ViewerConfig) -> Self {
        Self {
            api,
            renderer,
            tz,
            locale,
            limit: viewer.measurement_limit,
            selection: Selection::default(),
            date: None,
            list: ListState::new(viewer.page_size),
            notices: NoticeState::default(),
            irradiance_chart: ChartSlot::new(CANVAS_IRRADIANCE),
            temperature_chart: ChartSlot::new(CANVAS_DEVICE_TEMPERATURE),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Start a query for `system_id` on `date`; earlier queries become stale
    pub fn begin_load(&mut self, system_id: &str, date: NaiveDate, now: DateTime<Utc>) -> (FetchToken, MeasurementQuery) {
        let token = self.selection.select(system_id);
        self.date = Some(date);
        self.list.begin_loading();

        let (start, end) = day_range(date, now, self.tz);
        let query = MeasurementQuery {
            system_id: system_id.to_string(),
            start,
            end,
            limit: self.limit,
        };
        (token, query)
    }

    /// Apply a query result; returns false if it was stale and dropped
    pub fn apply_load(&mut self, token: FetchToken, result: Result<Vec<Measurement>>) -> bool {
        if !self.selection.accepts(token) {
            tracing::debug!("Dropping stale measurement response");
            return false;
        }

        match result {
            Ok(mut rows) => {
                sort_by_timestamp(&mut rows);
                tracing::debug!("Loaded {} measurements", rows.len());
                self.list.replace(rows);
                self.render_charts();
            }
            Err(e) => {
                let message = t_with(self.locale, "table-load-failed", &[("error", &e.to_string())]);
                self.notices.error(message.clone());
                self.list.fail(message);
                self.irradiance_chart.clear(&mut self.renderer);
                self.temperature_chart.clear(&mut self.renderer);
            }
        }
        true
    }

    /// Query and apply in one go
    pub async fn load(&mut self, system_id: &str, date: NaiveDate, now: DateTime<Utc>) -> bool {
        let (token, query) = self.begin_load(system_id, date, now);
        let result = self.api.list_measurements(&query).await;
        self.apply_load(token, result) && matches!(self.list.load_state(), LoadState::Ready)
    }

    /// Re-run the current query
    pub async fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        let (Some((_, system_id)), Some(date)) = (self.selection.token(), self.date) else {
            return false;
        };
        let system_id = system_id.to_string();
        self.load(&system_id, date, now).await
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        self.list.go_to(page)
    }

    /// Irradiance and device-temperature charts over the whole day, one point per row
    pub fn charts(&self) -> (ChartSpec, ChartSpec) {
        let rows = self.list.rows();
        let series = |name: &str, value: fn(&Measurement) -> Option<f64>| PrimarySeries {
            name: name.to_string(),
            samples: rows
                .iter()
                .map(|m| Sample::new(m.chart_label(self.tz), value(m)))
                .collect(),
        };

        let irradiance = series(&t(self.locale, "chart-irradiance"), |m| m.irradiance);
        let temperature = series(&t(self.locale, "chart-device-temperature"), |m| m.temperature);
        (
            ChartSpec {
                unit: "W/m²",
                data: plot_all(&irradiance),
            },
            ChartSpec {
                unit: "°C",
                data: plot_all(&temperature),
            },
        )
    }

    fn render_charts(&mut self) {
        let (irradiance, temperature) = self.charts();
        self.irradiance_chart.render(&mut self.renderer, &irradiance);
        self.temperature_chart.render(&mut self.renderer, &temperature);
    }

    /// Current page as text
    pub fn render_table(&self) -> String {
        match self.list.load_state() {
            LoadState::Idle | LoadState::Loading => t(self.locale, "table-loading"),
            LoadState::Error(message) => format!("❌ {message}"),
            LoadState::Ready => {
                let window = self.list.page();
                let offset = window.offset(self.list.pager().page_size());
                let rows: Vec<Row<'_>> = window
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, measurement)| Row {
                        number: offset + i + 1,
                        measurement,
                    })
                    .collect();

                let mut out = self.table().render(&rows);
                let selector = render_page_selector(
                    self.list.pager(),
                    &t(self.locale, "pager-prev"),
                    &t(self.locale, "pager-next"),
                );
                if !selector.is_empty() {
                    out.push_str("\n\n");
                    out.push_str(&selector);
                }
                out
            }
        }
    }

    fn table<'a>(&self) -> DataTable<Row<'a>> {
        let tz = self.tz;
        DataTable::new(vec![
            Column::new(t(self.locale, "col-index"), |r: &Row<'_>| r.number.to_string()).align_right(),
            Column::new(t(self.locale, "col-record-time"), move |r: &Row<'_>| {
                format_record_time(&r.measurement.wall_clock(tz))
            }),
            Column::new(t(self.locale, "col-irradiance"), |r: &Row<'_>| {
                format_value(r.measurement.irradiance, 2)
            })
            .align_right(),
            Column::new(t(self.locale, "col-temperature"), |r: &Row<'_>| {
                format_value(r.measurement.temperature, 2)
            })
            .align_right(),
        ])
        .empty_message(t(self.locale, "table-no-measurements"))
    }

    /// Write the loaded day to `dir` as CSV
    pub fn export(&mut self, dir: &Path) -> Result<PathBuf> {
        let (Some((_, system_id)), Some(date)) = (self.selection.token(), self.date) else {
            let message = t(self.locale, "export-empty");
            self.notices.warn(message.clone());
            return Err(Error::Validation { message });
        };

        match export_to_dir(dir, system_id, date, self.list.rows(), self.tz, self.locale) {
            Ok(path) => {
                let shown = path.display().to_string();
                self.notices
                    .info(t_with(self.locale, "export-done", &[("path", &shown)]));
                Ok(path)
            }
            Err(e) => {
                self.notices.warn(e.to_string());
                Err(e)
            }
        }
    }
}
