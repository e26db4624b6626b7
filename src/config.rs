use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;
use crate::debounce::DEFAULT_QUIET_PERIOD;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreKind,
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub database_id: String,
    #[serde(default)]
    pub collection_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    None,
    #[default]
    Memory,
    Appwrite,
}

fn default_tick_rate() -> f64 {
    30.0
}

fn default_debounce_ms() -> u64 {
    DEFAULT_QUIET_PERIOD.as_millis() as u64
}

fn default_trending_limit() -> usize {
    5
}

fn default_catalog_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_fps: default_tick_rate(),
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
            catalog_base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
            log_file: None,
            store: StoreConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreKind::default(),
            endpoint: default_appwrite_endpoint(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/moviefinder"))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        return AppConfig::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_default()
}
