//! # Config Module
//!
//! Locates and loads the settings file, and resolves the directories the
//! status line reads from (the active profile directory) and writes to (the
//! cache root).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::Settings;

/// Environment variable naming the active profile directory
pub const CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Overrides the cache root (normally `~/.cache`)
pub const CACHE_DIR_ENV: &str = "CCSTATUSLINE_CACHE_DIR";

pub const APP_DIR_NAME: &str = "ccstatusline";

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// `CLAUDE_CONFIG_DIR` (first entry when comma-separated), else `~/.claude`
pub fn active_config_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_DIR_ENV) {
        if let Some(first) = value.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return Some(PathBuf::from(first));
        }
    }
    home_dir().map(|h| h.join(".claude"))
}

/// Root under which `ccstatusline/` cache files live
pub fn cache_root() -> PathBuf {
    if let Ok(value) = std::env::var(CACHE_DIR_ENV) {
        if !value.trim().is_empty() {
            return PathBuf::from(value);
        }
    }
    home_dir()
        .map(|h| h.join(".cache"))
        .unwrap_or_else(std::env::temp_dir)
}

pub fn default_settings_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join(APP_DIR_NAME).join("settings.json"))
}

/// Parse a settings file
pub fn read_settings(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))
}

/// Load settings, falling back to defaults when the file is missing or unreadable
pub fn load_settings(path: Option<&Path>) -> Settings {
    let path = match path.map(Path::to_path_buf).or_else(default_settings_path) {
        Some(p) => p,
        None => return Settings::default(),
    };
    if !path.exists() {
        debug!(path = %path.display(), "settings file not found, using defaults");
        return Settings::default();
    }
    match read_settings(&path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("{err:#}; using default settings");
            Settings::default()
        }
    }
}
