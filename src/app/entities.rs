//! AppEntities - Shared Handles
//!
//! Everything a command needs, resolved once at startup.

use std::path::PathBuf;

use chrono_tz::Tz;

use crate::domain::config::AppConfig;
use crate::error::Result;
use crate::i18n::Locale;
use crate::services::api::ApiClient;
use crate::services::transport::ReqwestTransport;

/// Resolved configuration plus the backend client
#[derive(Clone)]
pub struct AppEntities {
    pub config: AppConfig,
    /// Where `config` was loaded from (or would be written to)
    pub config_path: PathBuf,
    pub locale: Locale,
    /// Zone the backend stores naive timestamps in
    pub tz: Tz,
    pub api: ApiClient<ReqwestTransport>,
}

impl AppEntities {
    pub fn init(config: AppConfig, config_path: PathBuf, locale: Locale) -> Result<Self> {
        let tz = config.backend.tz()?;
        let transport = ReqwestTransport::new(&config.backend.base_url, config.backend.timeout())?;
        tracing::info!("Backend: {} ({})", transport.base_url(), tz);

        Ok(Self {
            config,
            config_path,
            locale,
            tz,
            api: ApiClient::new(transport),
        })
    }
}
