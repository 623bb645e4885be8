use super::{format_rating, format_runtime};
use crate::output::{new_table, Output};
use crate::WatchedCommands;
use color_eyre::Result;
use comfy_table::Cell;
use popcorn_core::WatchedCollection;
use popcorn_models::WatchedSummary;
use serde_json::json;

pub fn run_watched(cmd: WatchedCommands, output: &Output) -> Result<()> {
    let config = super::load_config()?;
    let mut watched = super::load_watched(&config)?;

    match cmd {
        WatchedCommands::List => {
            render_watched(&watched, output);
            Ok(())
        }
        WatchedCommands::Summary => {
            render_summary(&watched, output);
            Ok(())
        }
        WatchedCommands::Remove { imdb_id } => remove_entry(&mut watched, &imdb_id, output),
    }
}

pub fn remove_entry(watched: &mut WatchedCollection, imdb_id: &str, output: &Output) -> Result<()> {
    let title = watched.get(imdb_id).map(|e| e.title.clone());
    let removed = watched
        .remove(imdb_id)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to update watched list: {}", e))?;
    match title {
        Some(title) if removed > 0 => output.success(format!("Removed \"{}\" from your watched list", title)),
        _ => output.warn(format!("{} is not in your watched list", imdb_id)),
    }
    Ok(())
}

pub fn render_watched(watched: &WatchedCollection, output: &Output) {
    if watched.is_empty() && output.is_human() {
        output.info("Your watched list is empty");
        return;
    }

    let mut table = new_table(&["IMDb ID", "Title", "Year", "Runtime", "IMDb", "Yours"]);
    for entry in watched.snapshot() {
        table.add_row(vec![
            Cell::new(&entry.imdb_id),
            Cell::new(&entry.title),
            Cell::new(&entry.year),
            Cell::new(format_runtime(entry.runtime)),
            Cell::new(format_rating(entry.imdb_rating)),
            Cell::new(format!("{:.1}", entry.user_rating)),
        ]);
    }
    output.table(table, json!({ "count": watched.len(), "watched": watched.snapshot() }));
}

pub fn render_summary(watched: &WatchedCollection, output: &Output) {
    let summary = WatchedSummary::from_entries(watched.snapshot());

    let mut table = new_table(&["Movies you watched", ""]);
    table.add_row(vec![Cell::new("Count"), Cell::new(summary.count)]);
    table.add_row(vec![
        Cell::new("Avg IMDb rating"),
        Cell::new(format!("{:.2}", summary.avg_imdb_rating)),
    ]);
    table.add_row(vec![
        Cell::new("Avg your rating"),
        Cell::new(format!("{:.2}", summary.avg_user_rating)),
    ]);
    table.add_row(vec![
        Cell::new("Avg runtime"),
        Cell::new(format!("{:.2} min", summary.avg_runtime)),
    ]);
    output.table(table, json!(summary));
}
