//! Console configuration, stored as TOML in the platform config
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub labels: LabelFilesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the curation API server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size for file list fetches.
    #[serde(default = "default_page_limit")]
    pub page_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Most thumbnails the jump-to picker will render.
    #[serde(default = "default_picker_cap")]
    pub picker_thumbnail_cap: usize,
    /// Start each session on a random item instead of the first.
    #[serde(default = "default_false")]
    pub randomize_order: bool,
    #[serde(default)]
    pub recent_datasets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LabelFilesConfig {
    /// Optional labels.yaml with per-label color/shortcut overrides.
    pub style_file: Option<String>,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_page_limit() -> u64 {
    200
}

fn default_picker_cap() -> usize {
    600
}

fn default_false() -> bool {
    false
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_limit: default_page_limit(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            picker_thumbnail_cap: default_picker_cap(),
            randomize_order: false,
            recent_datasets: Vec::new(),
        }
    }
}

/// Get the path to the config file
pub fn config_path() -> PathBuf {
    let config_dir = directories::ProjectDirs::from("", "", "siwa-annotator")
        .expect("Failed to determine config directory")
        .config_dir()
        .to_path_buf();
    config_dir.join("config.toml")
}

/// Load configuration from file, or return defaults if it doesn't exist
pub fn load_config() -> AppConfig {
    let path = config_path();
    if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {e}. Using defaults.");
                    AppConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {e}. Using defaults.");
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    }
}

/// Save configuration to file
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let path = config_path();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {e}"))?;
    }

    let toml = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;

    std::fs::write(&path, toml).map_err(|e| format!("Failed to write config file: {e}"))?;

    Ok(())
}

/// Add a dataset id to the recent list, most recent first.
pub fn add_recent_dataset(config: &mut AppConfig, dataset_id: String) {
    config
        .navigation
        .recent_datasets
        .retain(|d| d != &dataset_id);
    config.navigation.recent_datasets.insert(0, dataset_id);
    config.navigation.recent_datasets.truncate(10);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.page_limit, 200);
        assert_eq!(config.navigation.picker_thumbnail_cap, 600);
        assert!(!config.navigation.randomize_order);
    }

    #[test]
    fn recent_datasets_dedupe_and_truncate() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            add_recent_dataset(&mut config, format!("ds-{i}"));
        }
        add_recent_dataset(&mut config, "ds-5".to_string());
        assert_eq!(config.navigation.recent_datasets.len(), 10);
        assert_eq!(config.navigation.recent_datasets[0], "ds-5");
        assert_eq!(
            config
                .navigation
                .recent_datasets
                .iter()
                .filter(|d| *d == "ds-5")
                .count(),
            1
        );
    }
}
