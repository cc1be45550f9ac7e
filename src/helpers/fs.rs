//! File System Utilities
//!
//! Configuration file location.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{Error, Result};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "pvmonitor", "pv-console").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Default location of `config.toml`
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/pv-console/` or `$XDG_CONFIG_HOME/pv-console/`
/// - **macOS**: `~/Library/Application Support/com.pvmonitor.pv-console/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\pvmonitor\pv-console\config\`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}
