//! HTTP Transport
//!
//! The seam between typed endpoints and the wire. Production code goes through
//! reqwest; tests swap in a recording transport.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};

use crate::error::Result;

/// A request relative to the backend base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`, e.g. "/systems/"
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the backend
///
/// A transport error means no response was obtained at all; non-2xx answers
/// come back as `Ok` and are mapped by the caller.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for `base_url`
    ///
    /// # Arguments
    /// * `base_url` - scheme and host, e.g. "http://127.0.0.1:8000"
    /// * `timeout` - per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!("{} {} {:?}", request.method, url, request.query);

        let mut builder = self.client.request(request.method, &url).query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
