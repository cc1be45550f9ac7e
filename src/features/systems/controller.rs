//! Systems Controller
//!
//! Owns the system list, the create/edit form and the notice log, and talks
//! to `/systems/`. Every successful write is followed by exactly one list
//! refresh.

use crate::components::data_table::{Column, DataTable, render_page_selector};
use crate::constants::DEFAULT_PEAK_SUN_HOURS;
use crate::domain::config::ViewerConfig;
use crate::domain::performance::estimate_daily_energy;
use crate::domain::system::System;
use crate::error::Result;
use crate::i18n::{Locale, t, t_with};
use crate::services::api::{ApiClient, SystemQuery};
use crate::services::transport::HttpTransport;
use crate::state::{FormMode, FormState, ListState, LoadState, NoticeState};
use crate::utils::format::{format_value, truncate};

/// Asks the user to confirm an irreversible action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Systems page controller
pub struct SystemsController<T: HttpTransport> {
    api: ApiClient<T>,
    locale: Locale,
    query: SystemQuery,
    pub list: ListState<System>,
    pub form: FormState,
    pub notices: NoticeState,
}

impl<T: HttpTransport> SystemsController<T> {
    pub fn new(api: ApiClient<T>, locale: Locale, viewer: &ViewerConfig) -> Self {
        Self {
            api,
            locale,
            query: SystemQuery {
                limit: viewer.list_limit,
                is_active: None,
            },
            list: ListState::new(viewer.page_size),
            form: FormState::default(),
            notices: NoticeState::default(),
        }
    }

    /// Restrict the list to active or inactive systems
    pub fn filter_active(&mut self, is_active: Option<bool>) {
        self.query.is_active = is_active;
    }

    /// Reload the whole list; failures land in the list's error panel
    pub async fn refresh(&mut self) -> bool {
        self.list.begin_loading();
        match self.api.list_systems(self.query).await {
            Ok(systems) => {
                tracing::debug!("Loaded {} systems", systems.len());
                self.list.finish(systems);
                true
            }
            Err(e) => {
                let message = t_with(self.locale, "table-load-failed", &[("error", &e.to_string())]);
                self.notices.error(message.clone());
                self.list.fail(message);
                false
            }
        }
    }

    /// Cached copy if the list has it, else fetched from the backend
    pub async fn get(&self, system_id: &str) -> Result<System> {
        if let Some(system) = self.list.find(|s| s.system_id == system_id) {
            return Ok(system.clone());
        }
        self.api.get_system(system_id).await
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    /// Load a system into the form; the identifier becomes read-only
    pub async fn open_edit(&mut self, system_id: &str) -> Result<()> {
        match self.get(system_id).await {
            Ok(system) => {
                self.form.open_edit(&system);
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        self.form.close();
    }

    /// Validate and send the form
    ///
    /// Validation failures never reach the network. On success the form is
    /// closed and the list refreshed once.
    pub async fn submit(&mut self) -> Result<()> {
        let payload = match self.form.fields.to_payload(self.locale) {
            Ok(payload) => payload,
            Err(e) => {
                self.notices.warn(e.to_string());
                return Err(e);
            }
        };

        let result = match self.form.mode().clone() {
            FormMode::Create => self.api.create_system(&payload).await.map(|_| "notice-created"),
            FormMode::Edit { system_id } => self
                .api
                .update_system(&system_id, &payload)
                .await
                .map(|_| "notice-updated"),
        };

        match result {
            Ok(key) => {
                self.notices.info(t(self.locale, key));
                self.form.close();
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Delete after explicit confirmation
    ///
    /// Returns `Ok(false)` when the user declined; nothing is sent then.
    pub async fn delete(&mut self, system_id: &str, confirm: &mut impl Confirm) -> Result<bool> {
        let prompt = t_with(self.locale, "confirm-delete", &[("id", system_id)]);
        if !confirm.confirm(&prompt) {
            self.notices.info(t(self.locale, "notice-delete-cancelled"));
            return Ok(false);
        }

        if let Err(e) = self.api.delete_system(system_id).await {
            self.report(&e);
            return Err(e);
        }
        self.notices
            .info(t_with(self.locale, "notice-deleted", &[("id", system_id)]));
        self.refresh().await;
        Ok(true)
    }

    /// Navigate the list; out-of-range pages are ignored
    pub fn go_to(&mut self, page: usize) -> bool {
        self.list.go_to(page)
    }

    /// Current page as text: loading line, error panel or table plus selector
    pub fn render_list(&self) -> String {
        match self.list.load_state() {
            LoadState::Idle | LoadState::Loading => t(self.locale, "table-loading"),
            LoadState::Error(message) => format!("❌ {message}"),
            LoadState::Ready => {
                let window = self.list.page();
                let mut out = self.table().render(window.items);
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

    /// Detail view with the daily energy estimate
    pub fn render_detail(&self, system: &System, peak_sun_hours: Option<f64>) -> String {
        let locale = self.locale;
        let mut lines = vec![
            format!("{}: {}", t(locale, "col-system-id"), system.system_id),
            format!("{}: {}", t(locale, "col-name"), system.name),
            format!("{}: {}", t(locale, "col-capacity"), format_value(system.display_capacity(), 2)),
            format!(
                "{}: {}",
                t(locale, "col-panels"),
                system.panel_count.map_or("-".to_string(), |n| n.to_string())
            ),
            format!(
                "{}: {}",
                t(locale, "col-inverter"),
                system.inverter_model.as_deref().unwrap_or("-")
            ),
            format!("{}: {}", t(locale, "col-location"), system.display_location()),
            format!("{}: {}", t(locale, "col-status"), status_label(locale, system.is_active)),
        ];
        if let Some(capacity) = system.display_capacity() {
            let hours = peak_sun_hours.unwrap_or(DEFAULT_PEAK_SUN_HOURS);
            lines.push(format!(
                "{}: {:.2} kWh",
                t(locale, "energy-estimate"),
                estimate_daily_energy(capacity, hours, None)
            ));
        }
        lines.join("\n")
    }

    fn table(&self) -> DataTable<System> {
        let locale = self.locale;
        DataTable::new(vec![
            Column::new(t(locale, "col-system-id"), |s: &System| s.system_id.clone()),
            Column::new(t(locale, "col-name"), |s: &System| s.name.clone()).max_width(24),
            Column::new(t(locale, "col-capacity"), |s: &System| format_value(s.display_capacity(), 2))
                .align_right(),
            Column::new(t(locale, "col-location"), |s: &System| truncate(&s.display_location(), 28)),
            Column::new(t(locale, "col-status"), move |s: &System| status_label(locale, s.is_active)),
        ])
        .empty_message(t(locale, "table-no-systems"))
    }

    fn report(&mut self, error: &crate::error::Error) {
        self.notices.error(t_with(
            self.locale,
            "notice-request-failed",
            &[("error", &error.to_string())],
        ));
    }
}

fn status_label(locale: Locale, is_active: bool) -> String {
    if is_active {
        format!("● {}", t(locale, "status-active"))
    } else {
        format!("○ {}", t(locale, "status-inactive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::transport::testing::RecordingTransport;
    use reqwest::Method;

    const LIST: &str = r#"{"systems":[
        {"system_id":"PV-001","name":"Roof","panel_count":40,"panel_wattage":250.0,"is_active":true},
        {"system_id":"PV-002","name":"Carport","capacity":5.5,"is_active":false}
    ],"total":2}"#;

    fn controller(transport: RecordingTransport) -> SystemsController<RecordingTransport> {
        SystemsController::new(ApiClient::new(transport), Locale::ZhCN, &ViewerConfig::default())
    }

    fn transport() -> RecordingTransport {
        let transport = RecordingTransport::new();
        transport.reply(Method::GET, "/systems/", 200, LIST);
        transport
    }

    #[tokio::test]
    async fn test_refresh_fills_list() {
        let mut ctl = controller(transport());
        assert!(ctl.refresh().await);
        assert_eq!(ctl.list.rows().len(), 2);
        assert_eq!(ctl.list.load_state(), &LoadState::Ready);

        let text = ctl.render_list();
        assert!(text.contains("PV-001"));
        assert!(text.contains("10.00"));
        assert!(text.contains("已停用"));
    }

    #[tokio::test]
    async fn test_refresh_failure_shows_error_panel() {
        let transport = RecordingTransport::new();
        transport.reply(Method::GET, "/systems/", 500, "oops");
        let mut ctl = controller(transport);

        assert!(!ctl.refresh().await);
        assert!(matches!(ctl.list.load_state(), LoadState::Error(_)));
        assert_eq!(ctl.render_list(), "❌ 加载失败: HTTP 500");
        assert_eq!(ctl.notices.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_name_sends_nothing() {
        let mut ctl = controller(transport());
        ctl.open_create();
        ctl.form.set_field("system_id", "PV-003");

        let err = ctl.submit().await.expect_err("validation");
        assert!(err.is_validation());
        assert!(ctl.api.transport().requests().is_empty());
        assert!(ctl.form.is_open());
    }

    #[tokio::test]
    async fn test_create_posts_then_refreshes_once() {
        let transport = transport();
        transport.reply(Method::POST, "/systems/", 201, r#"{"system_id":"PV-003","name":"Shed"}"#);
        let mut ctl = controller(transport);

        ctl.open_create();
        ctl.form.set_field("system_id", " PV-003 ");
        ctl.form.set_field("name", "Shed");
        ctl.form.set_field("panel_count", "20");
        ctl.form.set_field("panel_wattage", "450");
        ctl.submit().await.expect("submit");

        let sent = ctl.api.transport().requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].method, Method::POST);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["system_id"], "PV-003");
        assert_eq!(body["capacity"], 9.0);
        assert_eq!(ctl.api.transport().count(&Method::GET, "/systems/"), 1);
        assert!(!ctl.form.is_open());
        assert_eq!(ctl.notices.last().map(|n| n.message.as_str()), Some("系统创建成功"));
    }

    #[tokio::test]
    async fn test_edit_uses_cache_and_puts() {
        let transport = transport();
        transport.reply(Method::PUT, "/systems/PV-001", 200, "{}");
        let mut ctl = controller(transport);
        ctl.refresh().await;

        ctl.open_edit("PV-001").await.expect("edit");
        assert!(ctl.form.is_id_locked());
        assert_eq!(ctl.form.submit_label_key(), "form-update");
        ctl.form.set_field("name", "Roof East");
        ctl.submit().await.expect("submit");

        let transport = ctl.api.transport();
        assert_eq!(transport.count(&Method::GET, "/systems/PV-001"), 0);
        assert_eq!(transport.count(&Method::PUT, "/systems/PV-001"), 1);
        assert_eq!(transport.count(&Method::GET, "/systems/"), 2);
    }

    #[tokio::test]
    async fn test_edit_fetches_unknown_system() {
        let transport = RecordingTransport::new();
        transport.reply(Method::GET, "/systems/PV-009", 200, r#"{"system_id":"PV-009","name":"Remote"}"#);
        let mut ctl = controller(transport);

        ctl.open_edit("PV-009").await.expect("edit");
        assert_eq!(ctl.form.fields.name, "Remote");
        assert_eq!(ctl.api.transport().count(&Method::GET, "/systems/PV-009"), 1);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_form_open() {
        let transport = transport();
        transport.reply(Method::POST, "/systems/", 400, r#"{"detail":"System PV-001 already exists"}"#);
        let mut ctl = controller(transport);

        ctl.open_create();
        ctl.form.set_field("system_id", "PV-001");
        ctl.form.set_field("name", "Dup");
        let err = ctl.submit().await.expect_err("remote");

        assert!(matches!(err, Error::Remote { status: 400, .. }));
        assert!(ctl.form.is_open());
        assert_eq!(ctl.api.transport().count(&Method::GET, "/systems/"), 0);
        assert!(
            ctl.notices
                .last()
                .is_some_and(|n| n.message.contains("System PV-001 already exists"))
        );
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let transport = transport();
        transport.reply(Method::DELETE, "/systems/PV-002", 204, "");
        let mut ctl = controller(transport);

        let mut decline = |_: &str| false;
        assert!(!ctl.delete("PV-002", &mut decline).await.expect("declined"));
        assert!(ctl.api.transport().requests().is_empty());

        let mut prompts = Vec::new();
        let mut accept = |prompt: &str| {
            prompts.push(prompt.to_string());
            true
        };
        assert!(ctl.delete("PV-002", &mut accept).await.expect("deleted"));

        let transport = ctl.api.transport();
        assert_eq!(transport.count(&Method::DELETE, "/systems/PV-002"), 1);
        assert_eq!(transport.count(&Method::GET, "/systems/"), 1);
        assert_eq!(transport.requests().len(), 2);
        assert!(prompts[0].contains("PV-002"));
    }

    #[tokio::test]
    async fn test_detail_shows_energy_estimate() {
        let mut ctl = controller(transport());
        ctl.refresh().await;
        let system = ctl.get("PV-001").await.expect("system");
        let text = ctl.render_detail(&system, Some(4.0));
        assert!(text.contains("预计日发电量: 34.00 kWh"));
    }
}
