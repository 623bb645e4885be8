use super::{format_rating, format_runtime};
use crate::output::{new_table, Output};
use crate::terminal;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use popcorn_core::{DetailState, DetailSync, KeyEvents};
use popcorn_models::{parse_rating, parse_runtime_minutes, DetailRecord, WatchedEntry};
use popcorn_sources::FetchError;
use serde_json::json;

pub async fn run_show(imdb_id: &str, rate: Option<f64>, add: bool, output: &Output) -> Result<()> {
    let config = super::load_config()?;
    let mut watched = super::load_watched(&config)?;

    let detail = DetailSync::with_options(
        super::catalog_source(&config),
        terminal::display_label(output.is_human(), &config.ui.default_title),
        KeyEvents::new(),
        &config.ui.cancel_key,
        &config.ui.default_title,
    );
    let mut rx = detail.subscribe();

    let spinner = super::spinner(output, format!("Loading {}...", imdb_id));
    detail.select(Some(imdb_id.to_string()));
    let state = rx
        .wait_for(|s| !s.loading)
        .await
        .map(|s| s.clone())
        .map_err(|e| color_eyre::eyre::eyre!("Detail view closed unexpectedly: {}", e))?;
    spinner.finish_and_clear();

    match &state.error {
        Some(err @ FetchError::NotFound { .. }) => {
            output.warn(err.to_string());
            return Ok(());
        }
        Some(err) => return Err(color_eyre::eyre::eyre!("{} ({})", err, err.detail())),
        None => {}
    }

    render_detail(&state, detail.watched_entry(&watched), output);

    if let Some(rating) = rate {
        detail.set_user_rating(rating)?;
        if !add {
            output.info(format!("Rated {} (not saved, pass --add to keep it)", rating));
        }
    }

    if add {
        let title = state.record.display_title().unwrap_or(imdb_id).to_string();
        if detail.add_to_watched(&mut watched)? {
            output.success(format!("Added \"{}\" to your watched list", title));
        } else {
            output.info(format!("\"{}\" is already in your watched list", title));
        }
    }

    Ok(())
}

/// Detail pane: the loaded record plus the stored rating when the title was already watched
pub fn render_detail(state: &DetailState, rated: Option<&WatchedEntry>, output: &Output) {
    let record = &state.record;
    let mut table = new_table(&[record.display_title().unwrap_or("(untitled)"), ""]);
    for (label, value) in detail_rows(record) {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    output.table(
        table,
        json!({
            "record": record,
            "runtime_minutes": parse_runtime_minutes(record.runtime.as_deref().unwrap_or_default()),
            "imdb_rating": parse_rating(record.imdb_rating.as_deref().unwrap_or_default()),
            "user_rating": rated.map(|e| e.user_rating),
        }),
    );

    if output.is_human() {
        match rated {
            Some(entry) => output.info(format!("You rated this movie with {} {}", entry.user_rating, "★".yellow())),
            None if state.user_rating > 0.0 => output.info(format!("Your rating: {}", state.user_rating)),
            None => {}
        }
    }
}

fn detail_rows(record: &DetailRecord) -> Vec<(&'static str, String)> {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    vec![
        ("Released", text(&record.released)),
        (
            "Runtime",
            format_runtime(parse_runtime_minutes(record.runtime.as_deref().unwrap_or_default())),
        ),
        ("Genre", text(&record.genre)),
        (
            "IMDb rating",
            format_rating(parse_rating(record.imdb_rating.as_deref().unwrap_or_default())),
        ),
        ("Plot", text(&record.plot)),
        ("Starring", text(&record.actors)),
        ("Directed by", text(&record.director)),
    ]
}
