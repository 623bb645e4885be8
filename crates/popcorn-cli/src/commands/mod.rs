pub mod config;
pub mod interactive;
pub mod prompts;
pub mod search;
pub mod show;
pub mod watched;

use crate::output::Output;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use popcorn_config::{Config, PathManager};
use popcorn_core::{open_watched, WatchedCollection};
use popcorn_sources::{CatalogSource, OmdbClient};
use std::sync::Arc;
use std::time::Duration;

/// Load config.toml (defaults when absent), apply environment overrides and validate
pub fn load_config() -> Result<Config> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    let config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    }
    .with_env_overrides();

    config.validate().map_err(|e| {
        color_eyre::eyre::eyre!("{}. Run 'popcorn config init' to set up your configuration.", e)
    })?;
    Ok(config)
}

pub fn catalog_source(config: &Config) -> Arc<dyn CatalogSource> {
    Arc::new(OmdbClient::from_config(&config.catalog))
}

pub fn load_watched(config: &Config) -> Result<WatchedCollection> {
    let path_manager = PathManager::default();
    open_watched(config, &path_manager)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open watched list: {}", e))
}

/// Steady spinner on stderr; hidden for quiet or JSON output
pub fn spinner(output: &Output, message: impl Into<String>) -> ProgressBar {
    if output.is_quiet() || !output.is_human() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn format_rating(rating: Option<f64>) -> String {
    rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "N/A".to_string())
}

pub fn format_runtime(minutes: u32) -> String {
    if minutes == 0 {
        "N/A".to_string()
    } else {
        format!("{} min", minutes)
    }
}
