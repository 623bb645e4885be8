use super::prompts;
use crate::output::{new_table, Output};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use popcorn_config::{Config, PathManager, API_KEY_ENV};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Init { api_key, force } => init_config(api_key, force, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    let exists = config_file.exists();
    let config = if exists {
        Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Showing defaults. Run 'popcorn config init' to create it.");
        Config::default()
    }
    .with_env_overrides();

    let api_key = if full {
        config.catalog.api_key.clone()
    } else {
        mask_string(&config.catalog.api_key)
    };
    let storage_dir = config
        .storage
        .dir
        .clone()
        .unwrap_or_else(|| path_manager.storage_dir());
    let status = match config.validate() {
        Ok(()) => "✓ valid".green().to_string(),
        Err(e) => format!("{} {}", "✗".red(), e),
    };

    let mut table = new_table(&["Setting", "Value"]);
    table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("catalog.endpoint"), Cell::new(&config.catalog.endpoint)]);
    table.add_row(vec![Cell::new("catalog.api_key"), Cell::new(&api_key)]);
    table.add_row(vec![Cell::new("catalog.min_query_len"), Cell::new(config.catalog.min_query_len)]);
    table.add_row(vec![Cell::new("storage.key"), Cell::new(&config.storage.key)]);
    table.add_row(vec![Cell::new("storage.dir"), Cell::new(storage_dir.display())]);
    table.add_row(vec![Cell::new("ui.cancel_key"), Cell::new(&config.ui.cancel_key)]);
    table.add_row(vec![Cell::new("ui.default_title"), Cell::new(&config.ui.default_title)]);
    table.add_row(vec![Cell::new("Status"), Cell::new(status)]);

    output.table(
        table,
        json!({
            "config_file": config_file.display().to_string(),
            "exists": exists,
            "catalog": {
                "endpoint": config.catalog.endpoint,
                "api_key": api_key,
                "min_query_len": config.catalog.min_query_len,
            },
            "storage": {
                "key": config.storage.key,
                "dir": storage_dir.display().to_string(),
            },
            "ui": {
                "cancel_key": config.ui.cancel_key,
                "default_title": config.ui.default_title,
            },
            "valid": config.validate().is_ok(),
        }),
    );
    Ok(())
}

fn init_config(api_key: Option<String>, force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    let mut config = if config_file.exists() {
        if !force && !prompts::prompt_yes_no("A configuration already exists. Update it?", Some(true))? {
            output.info("Configuration left unchanged.");
            return Ok(());
        }
        Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };

    config.catalog.api_key = match api_key {
        Some(key) => key.trim().to_string(),
        None => {
            output.info(format!(
                "Get a free key at https://www.omdbapi.com/apikey.aspx (or set {} instead).",
                API_KEY_ENV
            ));
            let existing = (!config.catalog.api_key.is_empty()).then_some(config.catalog.api_key.as_str());
            prompts::prompt_string("OMDb API key", existing)?.trim().to_string()
        }
    };

    if !force {
        config.catalog.min_query_len =
            prompts::prompt_positive("Minimum query length", config.catalog.min_query_len)?;
        config.ui.cancel_key = prompts::prompt_string("Key that closes the detail view", Some(&config.ui.cancel_key))?
            .trim()
            .to_string();
    }

    if let Err(e) = config.clone().with_env_overrides().validate() {
        output.warn(format!("Saved configuration is incomplete: {}", e));
    }

    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.chars().count() <= 4 {
        return "*".repeat(s.chars().count());
    }
    let chars: Vec<char> = s.chars().collect();
    format!(
        "{}***{}",
        chars[..2].iter().collect::<String>(),
        chars[chars.len() - 2..].iter().collect::<String>()
    )
}
