use super::search::render_results;
use super::show::render_detail;
use super::watched::{remove_entry, render_summary, render_watched};
use crate::output::Output;
use crate::terminal;
use color_eyre::Result;
use popcorn_core::{DetailState, DetailSync, KeyEvents, SearchState, SearchSync, WatchedCollection};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "\
Type a title to search. Commands:
  :open N    show result N (again to close)
  :rate N    rate the open title, 1 to 10
  :add       add the open title to your watched list
  :esc       close the detail view
  :watched   list watched titles
  :summary   averages across the watched list
  :rm ID     remove a title from the watched list
  :quit      leave";

/// One line of user input
#[derive(Debug, PartialEq)]
enum Line {
    Query(String),
    Open(usize),
    Rate(f64),
    Add,
    Escape,
    Watched,
    Summary,
    Remove(String),
    Help,
    Quit,
    Invalid(String),
}

impl Line {
    fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        let Some(cmd) = line.strip_prefix(':') else {
            return Line::Query(line.to_string());
        };

        let mut parts = cmd.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        match (name, arg) {
            ("open" | "o", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Line::Open(n),
                _ => Line::Invalid(format!("Not a result number: {}", n)),
            },
            ("rate" | "r", Some(r)) => match r.parse::<f64>() {
                Ok(r) => Line::Rate(r),
                Err(_) => Line::Invalid(format!("Not a rating: {}", r)),
            },
            ("add" | "a", None) => Line::Add,
            ("esc", None) => Line::Escape,
            ("watched" | "w", None) => Line::Watched,
            ("summary" | "s", None) => Line::Summary,
            ("rm", Some(id)) => Line::Remove(id.to_string()),
            ("help" | "h", None) => Line::Help,
            ("quit" | "q", None) => Line::Quit,
            _ => Line::Invalid(format!("Unknown command ':{}', try :help", cmd.trim())),
        }
    }
}

/// Whether the detail pane needs redrawing. Rating changes are echoed where they are made.
fn detail_changed(prev: &DetailState, next: &DetailState) -> bool {
    prev.selected != next.selected
        || prev.loading != next.loading
        || prev.record != next.record
        || prev.error != next.error
}

pub async fn run_interactive(output: &Output) -> Result<()> {
    let config = super::load_config()?;
    let mut watched = super::load_watched(&config)?;
    let min_len = config.catalog.min_query_len;

    let source = super::catalog_source(&config);
    let keys = KeyEvents::new();
    let mut search = SearchSync::new(Arc::clone(&source), min_len);
    let detail = DetailSync::with_options(
        source,
        terminal::display_label(output.is_human(), &config.ui.default_title),
        keys.clone(),
        &config.ui.cancel_key,
        &config.ui.default_title,
    );

    let mut search_rx = search.subscribe();
    let mut detail_rx = detail.subscribe();
    let mut last_detail = DetailState::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(watched = watched.len(), "Interactive session started");
    output.info(HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let parsed = Line::parse(&line);
                debug!(input = ?parsed, "Interactive input");
                match parsed {
                    Line::Quit => break,
                    Line::Query(query) => search.set_query(query),
                    Line::Open(n) => match search.state().results.get(n - 1) {
                        Some(result) => detail.toggle(&result.imdb_id),
                        None => output.warn(format!("No result #{}", n)),
                    },
                    Line::Rate(rating) => match detail.set_user_rating(rating) {
                        Ok(()) => output.info(format!("Your rating: {}", rating)),
                        Err(e) => output.warn(e.to_string()),
                    },
                    Line::Add => match detail.add_to_watched(&mut watched) {
                        Ok(true) => output.success("Added to your watched list"),
                        Ok(false) => output.info("Already in your watched list"),
                        Err(e) => output.error(e.to_string()),
                    },
                    Line::Escape => {
                        keys.dispatch(&detail.cancel_key());
                    }
                    Line::Watched => render_watched(&watched, output),
                    Line::Summary => render_summary(&watched, output),
                    Line::Remove(id) => {
                        if let Err(e) = remove_entry(&mut watched, &id, output) {
                            output.error(e.to_string());
                        }
                    }
                    Line::Help => output.info(HELP),
                    Line::Invalid(msg) => output.warn(msg),
                }
            }
            Ok(()) = search_rx.changed() => {
                let state = search_rx.borrow_and_update().clone();
                show_search(&state, min_len, output);
            }
            Ok(()) = detail_rx.changed() => {
                let state = detail_rx.borrow_and_update().clone();
                if detail_changed(&last_detail, &state) {
                    show_detail(&last_detail, &state, &watched, output);
                }
                last_detail = state;
            }
        }
    }

    drop(detail);
    drop(search);
    info!("Interactive session ended");
    Ok(())
}

fn show_search(state: &SearchState, min_len: usize, output: &Output) {
    if state.loading {
        output.info(format!("Searching for \"{}\"...", state.query));
    } else if let Some(message) = state.error_message() {
        output.warn(message);
    } else if state.query.trim().chars().count() >= min_len {
        render_results(state, output);
    }
}

fn show_detail(prev: &DetailState, state: &DetailState, watched: &WatchedCollection, output: &Output) {
    match &state.selected {
        None if prev.selected.is_some() => output.info("Detail view closed"),
        None => {}
        Some(id) if state.loading => output.info(format!("Loading {}...", id)),
        Some(_) => match state.error_message() {
            Some(message) => output.warn(message),
            None => render_detail(state, state.selected.as_deref().and_then(|id| watched.get(id)), output),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_queries() {
        assert_eq!(Line::parse("inception"), Line::Query("inception".to_string()));
        assert_eq!(Line::parse("the matrix\r\n"), Line::Query("the matrix".to_string()));
        assert_eq!(Line::parse(""), Line::Query(String::new()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(Line::parse(":open 2"), Line::Open(2));
        assert_eq!(Line::parse(":rate 8.5"), Line::Rate(8.5));
        assert_eq!(Line::parse(":add"), Line::Add);
        assert_eq!(Line::parse(":esc"), Line::Escape);
        assert_eq!(Line::parse(":rm tt1375666"), Line::Remove("tt1375666".to_string()));
        assert_eq!(Line::parse(":q"), Line::Quit);
    }

    #[test]
    fn test_bad_commands() {
        assert!(matches!(Line::parse(":open 0"), Line::Invalid(_)));
        assert!(matches!(Line::parse(":open"), Line::Invalid(_)));
        assert!(matches!(Line::parse(":rate high"), Line::Invalid(_)));
        assert!(matches!(Line::parse(":dance"), Line::Invalid(_)));
    }

    #[test]
    fn test_rating_change_alone_does_not_redraw() {
        let loaded = DetailState {
            selected: Some("tt1375666".to_string()),
            ..DetailState::default()
        };
        let rated = DetailState {
            user_rating: 8.0,
            ..loaded.clone()
        };
        assert!(!detail_changed(&loaded, &rated));
        assert!(detail_changed(&DetailState::default(), &loaded));
    }
}
