//! Backend API Client
//!
//! Typed access to the monitoring backend. Response-shape ambiguity (bare
//! array vs. wrapped object) is resolved here and never leaks to callers.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;

use super::transport::{ApiRequest, HttpTransport};
use crate::domain::measurement::{MeasuredRadiation, Measurement};
use crate::domain::system::{System, SystemPayload};
use crate::domain::weather::{CurrentWeather, Forecast};
use crate::error::{Error, Result};
use crate::utils::time::TimeBound;

/// Query for the system list
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemQuery {
    pub limit: usize,
    pub is_active: Option<bool>,
}

/// Query for one system's measurements
#[derive(Debug, Clone)]
pub struct MeasurementQuery {
    pub system_id: String,
    pub start: TimeBound,
    pub end: TimeBound,
    pub limit: usize,
}

/// Client for the PV monitoring REST API
pub struct ApiClient<T: HttpTransport> {
    transport: Arc<T>,
}

impl<T: HttpTransport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ==================== Systems ====================

    /// `GET /systems/?limit=N`
    pub async fn list_systems(&self, query: SystemQuery) -> Result<Vec<System>> {
        let mut request = ApiRequest::get("/systems/").query("limit", query.limit);
        if let Some(active) = query.is_active {
            request = request.query("is_active", active);
        }
        let body = self.call(request).await?;
        normalize_list(&body, "systems")
    }

    /// `GET /systems/{id}`
    pub async fn get_system(&self, system_id: &str) -> Result<System> {
        let body = self.call(ApiRequest::get(system_path(system_id))).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `POST /systems/`
    pub async fn create_system(&self, payload: &SystemPayload) -> Result<()> {
        let request = ApiRequest::new(Method::POST, "/systems/").json(serde_json::to_value(payload)?);
        self.call(request).await?;
        Ok(())
    }

    /// `PUT /systems/{id}`
    pub async fn update_system(&self, system_id: &str, payload: &SystemPayload) -> Result<()> {
        let request =
            ApiRequest::new(Method::PUT, system_path(system_id)).json(serde_json::to_value(payload)?);
        self.call(request).await?;
        Ok(())
    }

    /// `DELETE /systems/{id}`
    pub async fn delete_system(&self, system_id: &str) -> Result<()> {
        self.call(ApiRequest::new(Method::DELETE, system_path(system_id)))
            .await?;
        Ok(())
    }

    // ==================== Measurements ====================

    /// `GET /measurements/?system_id=&start_time=&end_time=&limit=`
    pub async fn list_measurements(&self, query: &MeasurementQuery) -> Result<Vec<Measurement>> {
        let request = ApiRequest::get("/measurements/")
            .query("system_id", &query.system_id)
            .query("start_time", query.start.to_query_value())
            .query("end_time", query.end.to_query_value())
            .query("limit", query.limit);
        let body = self.call(request).await?;
        normalize_list(&body, "measurements")
    }

    // ==================== Weather ====================

    /// `GET /weather/current_cached?system_id=`
    pub async fn current_weather(&self, system_id: &str) -> Result<CurrentWeather> {
        let request = ApiRequest::get("/weather/current_cached").query("system_id", system_id);
        let body = self.call(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /weather/forecast_cached?system_id=&days=`
    pub async fn forecast(&self, system_id: &str, days: u32) -> Result<Forecast> {
        let request = ApiRequest::get("/weather/forecast_cached")
            .query("system_id", system_id)
            .query("days", days);
        let body = self.call(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /weather/measured_radiation?system_id=&start_time=&end_time=`
    pub async fn measured_radiation(
        &self,
        system_id: &str,
        start: TimeBound,
        end: TimeBound,
    ) -> Result<Vec<MeasuredRadiation>> {
        let request = ApiRequest::get("/weather/measured_radiation")
            .query("system_id", system_id)
            .query("start_time", start.to_query_value())
            .query("end_time", end.to_query_value());
        let body = self.call(request).await?;
        normalize_list(&body, "measurements")
    }

    /// Send and map non-2xx answers to [`Error::Remote`]
    async fn call(&self, request: ApiRequest) -> Result<String> {
        let method = request.method.clone();
        let path = request.path.clone();

        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::warn!("{} {} failed: {}", method, path, e);
        })?;

        if !response.is_success() {
            tracing::warn!("{} {} returned {}", method, path, response.status);
            return Err(Error::from_response(response.status, &response.body));
        }
        Ok(response.body)
    }
}

/// `/systems/{id}` with the id percent-encoded as one path segment
fn system_path(system_id: &str) -> String {
    format!("/systems/{}", urlencoding::encode(system_id))
}

/// Accept either `[...]` or `{ "<field>": [...] }`
pub fn normalize_list<R: DeserializeOwned>(body: &str, field: &str) -> Result<Vec<R>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let items = match value {
        serde_json::Value::Array(items) => serde_json::Value::Array(items),
        serde_json::Value::Object(mut map) => match map.remove(field) {
            Some(items @ serde_json::Value::Array(_)) => items,
            Some(serde_json::Value::Null) | None => serde_json::Value::Array(Vec::new()),
            Some(other) => {
                return Err(Error::Invalid {
                    message: format!("field '{field}' is not a list: {other}"),
                });
            }
        },
        serde_json::Value::Null => serde_json::Value::Array(Vec::new()),
        other => {
            return Err(Error::Invalid {
                message: format!("unexpected list response: {other}"),
            });
        }
    };
    Ok(serde_json::from_value(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transport::testing::RecordingTransport;

    const SYSTEM: &str = r#"{"system_id":"PV-001","name":"Roof","is_active":true}"#;

    #[test]
    fn test_normalize_both_shapes() {
        let bare: Vec<System> = normalize_list(&format!("[{SYSTEM}]"), "systems").expect("bare");
        let wrapped: Vec<System> =
            normalize_list(&format!(r#"{{"systems":[{SYSTEM}],"total":1}}"#), "systems")
                .expect("wrapped");
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 1);

        let empty: Vec<System> = normalize_list(r#"{"total":0}"#, "systems").expect("empty");
        assert!(empty.is_empty());
        assert!(normalize_list::<System>("42", "systems").is_err());
    }

    #[test]
    fn test_system_path_encodes_id() {
        assert_eq!(system_path("PV-001"), "/systems/PV-001");
        assert_eq!(system_path("a b/c"), "/systems/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_list_systems_query() {
        let transport = RecordingTransport::new();
        transport.reply(Method::GET, "/systems/", 200, &format!("[{SYSTEM}]"));
        let client = ApiClient::new(transport);

        let systems = client
            .list_systems(SystemQuery { limit: 1000, is_active: Some(true) })
            .await
            .expect("systems");
        assert_eq!(systems[0].system_id, "PV-001");

        let sent = client.transport().requests();
        assert_eq!(
            sent[0].query,
            vec![("limit".to_string(), "1000".to_string()), ("is_active".to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_remote_error_uses_detail() {
        let transport = RecordingTransport::new();
        transport.reply(Method::GET, "/systems/PV-404", 404, r#"{"detail":"System not found"}"#);
        let client = ApiClient::new(transport);

        let err = client.get_system("PV-404").await.expect_err("404");
        assert!(matches!(err, Error::Remote { status: 404, .. }));
        assert_eq!(err.to_string(), "System not found");
    }

    #[tokio::test]
    async fn test_network_error_passes_through() {
        let transport = RecordingTransport::new();
        transport.fail(Method::DELETE, "/systems/PV-001", "connection refused");
        let client = ApiClient::new(transport);

        let err = client.delete_system("PV-001").await.expect_err("network");
        assert!(matches!(err, Error::Network { .. }));
    }
}
