use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::entities::conversion::ConversionKind;

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub log_filter: String,
    pub window_title: String,
    pub confirm_row_delete: bool,
    pub default_conversion: ConversionKind,
    pub default_pricing_type: String,
    pub default_price_priority: String,
    /// Makes the mock reference-data provider fail, to exercise the
    /// empty-dropdown path.
    pub reference_data_fails: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            window_title: "Pricing Entry".to_string(),
            confirm_row_delete: true,
            default_conversion: ConversionKind::Standard,
            default_pricing_type: "Standard".to_string(),
            default_price_priority: "1".to_string(),
            reference_data_fails: false,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "wasteops", "pricing-grid")
        .ok_or_else(|| anyhow!("unable to resolve application directories"))
}

pub fn default_settings_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(SETTINGS_FILE))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}

impl AppSettings {
    /// A missing file means defaults; a file that exists must parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse settings: {}", path.display()))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&default_settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write settings: {}", path.display()))
    }
}
