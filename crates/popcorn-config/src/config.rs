use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `catalog.api_key`
pub const API_KEY_ENV: &str = "POPCORN_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    /// Queries shorter than this never reach the network
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the watched list is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Defaults to the data directory's `storage/` subdir
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Key that closes the detail view
    #[serde(default = "default_cancel_key")]
    pub cancel_key: String,
    /// Label shown when no title is selected
    #[serde(default = "default_title")]
    pub default_title: String,
}

fn default_endpoint() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_min_query_len() -> usize {
    3
}

fn default_storage_key() -> String {
    "watched".to_string()
}

fn default_cancel_key() -> String {
    "Escape".to_string()
}

fn default_title() -> String {
    "usePopcorn".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            dir: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            cancel_key: default_cancel_key(),
            default_title: default_title(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides (currently only the API key)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.catalog.api_key = key.trim().to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "catalog.api_key is not configured (set it in config.toml or {})",
                API_KEY_ENV
            ));
        }

        let endpoint = self.catalog.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "catalog.endpoint must be an http(s) URL, got '{}'",
                self.catalog.endpoint
            ));
        }

        if self.catalog.min_query_len == 0 {
            return Err(anyhow::anyhow!("catalog.min_query_len must be at least 1"));
        }

        if self.storage.key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.key cannot be empty"));
        }

        if self.ui.cancel_key.trim().is_empty() {
            return Err(anyhow::anyhow!("ui.cancel_key cannot be empty"));
        }

        Ok(())
    }
}
