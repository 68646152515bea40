//! Configuration module
//!
//! Handles loading settings from YAML files, `.env` and environment variables.
//! Settings are loaded once at startup and passed around explicitly.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "INTERNET_SEARCH_SETTINGS_PATH";

/// Load settings from an explicit path, the environment, the default
/// locations, or fall back to defaults. Environment overrides are merged last.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match locate(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        // An explicit path must exist; let the read fail loudly
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("internet-search/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}
