//! Configuration management
//!
//! Read from `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "storeFile": "cmdb.duckdb", "eventLog": true, ... }
//! }
//! ```
//! Fields this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_STORE_FILE: &str = "cmdb.duckdb";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    store_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_log: Option<bool>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Console configuration (resolved view of settings + environment)
#[derive(Debug, Clone)]
pub struct Config {
    /// File name of the key-value store, relative to the data directory
    pub store_file: String,
    /// Whether commands are recorded in logs.duckdb
    pub event_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: DEFAULT_STORE_FILE.to_string(),
            event_log: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %settings_path.display(), error = %e, "Malformed settings.json, using defaults");
        SettingsFile::default()
    }))
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment overrides: `CMDB_STORE_FILE`, `CMDB_EVENT_LOG`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let defaults = Self::default();

        let store_file = std::env::var("CMDB_STORE_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or(raw.app.store_file)
            .unwrap_or(defaults.store_file);

        let event_log = std::env::var("CMDB_EVENT_LOG")
            .ok()
            .as_deref()
            .and_then(parse_bool)
            .or(raw.app.event_log)
            .unwrap_or(defaults.event_log);

        Ok(Self {
            store_file,
            event_log,
        })
    }

    /// Save config to the data directory, keeping unmanaged fields
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.app.store_file = Some(self.store_file.clone());
        settings.app.event_log = Some(self.event_log);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }
}
