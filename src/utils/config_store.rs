//! ConfigStore - Local Configuration Storage
//!
//! `AppConfig` lives in a single TOML file. A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::config::AppConfig;
use crate::error::Result;
use crate::helpers::default_config_path;

/// Resolve the config file path: explicit override or the platform default
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load the configuration, falling back to defaults when the file is absent
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write the configuration, creating the parent directory if needed
pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    tracing::info!("Config written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pv-console-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = scratch_dir("missing").join("config.toml");
        let config = load_config(&path).expect("config");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.backend.base_url = "http://pv.example:9000".to_string();
        config.locale = Some("en".to_string());
        save_config(&path, &config).expect("save");

        assert_eq!(load_config(&path).expect("load"), config);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(config_path(Some(&explicit)).expect("path"), explicit);
    }
}
