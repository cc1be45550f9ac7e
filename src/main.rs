//! PV Console - Main Entry Point
//!
//! Admin and data-visualization client for the photovoltaic monitoring service

use std::process::ExitCode;

use clap::Parser;
use pv_console::app::application::run_app;
use pv_console::app::entities::AppEntities;
use pv_console::app::logging::init_tracing;
use pv_console::cli::Cli;
use pv_console::i18n::Locale;
use pv_console::utils::config_store::{config_path, load_config};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let path = config_path(cli.config.as_deref())?;
    let mut config = load_config(&path)?;
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }

    // Held until exit so the file writer can flush
    let _guard = init_tracing(&config.log);
    tracing::info!("Starting PV Console {}", env!("CARGO_PKG_VERSION"));

    let locale = Locale::detect(cli.locale.as_deref().or(config.locale.as_deref()));
    let entities = AppEntities::init(config, path, locale)?;

    run_app(cli, entities).await
}
