use crate::output::{new_table, Output};
use color_eyre::Result;
use comfy_table::Cell;
use popcorn_core::{SearchState, SearchSync};
use popcorn_sources::FetchError;
use serde_json::json;
use tracing::debug;

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    let config = super::load_config()?;
    let min_len = config.catalog.min_query_len;
    let mut sync = SearchSync::new(super::catalog_source(&config), min_len);
    let mut rx = sync.subscribe();

    let spinner = super::spinner(output, format!("Searching for \"{}\"...", query));
    sync.set_query(query);
    let state = rx
        .wait_for(|s| !s.loading)
        .await
        .map(|s| s.clone())
        .map_err(|e| color_eyre::eyre::eyre!("Search stopped unexpectedly: {}", e))?;
    spinner.finish_and_clear();

    debug!(query = %query, results = state.result_count(), "Search settled");

    match &state.error {
        Some(err @ FetchError::NotFound { .. }) => {
            output.warn(err.to_string());
            Ok(())
        }
        Some(err) => Err(color_eyre::eyre::eyre!("{} ({})", err, err.detail())),
        None if query.trim().chars().count() < min_len => {
            output.warn(format!("Type at least {} characters to search", min_len));
            Ok(())
        }
        None => {
            render_results(&state, output);
            Ok(())
        }
    }
}

/// Numbered result list; the numbers are what `:open n` refers to
pub fn render_results(state: &SearchState, output: &Output) {
    let mut table = new_table(&["#", "Title", "Year", "IMDb ID"]);
    for (i, result) in state.results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&result.title),
            Cell::new(&result.year),
            Cell::new(&result.imdb_id),
        ]);
    }

    if output.is_human() {
        output.info(format!("Found {} results", state.result_count()));
    }
    output.table(
        table,
        json!({
            "query": state.query,
            "count": state.result_count(),
            "results": state.results,
        }),
    );
}
