pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, StorageConfig, UiConfig, API_KEY_ENV};
pub use paths::{home_override, PathManager};
