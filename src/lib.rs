//! PV Console Library
//!
//! Admin and data-visualization client for a photovoltaic monitoring
//! backend: system administration, daily measurement browsing and export,
//! and a weather dashboard with forecast charts.

pub mod app;
pub mod cli;
pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod features;
pub mod helpers;
pub mod i18n;
pub mod services;
pub mod state;
pub mod utils;
