//! Utils - Time, Formatting and Config Storage

pub mod config_store;
pub mod format;
pub mod time;
