use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "threat-dragon";
const CONFIG_FILE: &str = "desktop.json";
const RECENT_FILE: &str = "recent.json";

/// User settings for the desktop shell, read from `desktop.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesktopConfig {
    /// Locale code; the OS locale is used when absent
    pub locale: Option<String>,
    pub recent_capacity: usize,
    pub default_file_name: String,
    pub model_extensions: Vec<String>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            locale: None,
            recent_capacity: 10,
            default_file_name: "new-model.json".to_string(),
            model_extensions: vec!["json".to_string()],
        }
    }
}

impl DesktopConfig {
    /// `<config_dir>/threat-dragon`, if the platform has a config directory
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }

    pub fn recent_file(dir: &Path) -> PathBuf {
        dir.join(RECENT_FILE)
    }

    /// Load `desktop.json` from `dir`. A missing file gives the defaults.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load from the platform config directory, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(dir) = Self::dir() else {
            log::warn!("No config directory on this platform, using default settings");
            return Self::default();
        };
        match Self::load(&dir) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default settings: {:#}", e);
                Self::default()
            }
        }
    }
}
