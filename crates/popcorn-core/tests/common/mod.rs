#![allow(dead_code)]

use async_trait::async_trait;
use popcorn_models::{DetailRecord, SearchResult};
use popcorn_sources::{CatalogSource, FetchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
struct Scripted<T> {
    delay: Duration,
    result: Result<T, FetchError>,
}

/// Catalog whose answers and latencies are fixed up front.
///
/// Unscripted searches and lookups answer `NotFound` immediately.
#[derive(Default)]
pub struct ScriptedCatalog {
    searches: Mutex<HashMap<String, Scripted<Vec<SearchResult>>>>,
    details: Mutex<HashMap<String, Scripted<DetailRecord>>>,
    calls: Mutex<Vec<String>>,
    completed: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_ok(self, query: &str, delay_ms: u64, results: Vec<SearchResult>) -> Self {
        self.searches.lock().unwrap().insert(
            query.to_string(),
            Scripted { delay: Duration::from_millis(delay_ms), result: Ok(results) },
        );
        self
    }

    pub fn search_err(self, query: &str, delay_ms: u64, err: FetchError) -> Self {
        self.searches.lock().unwrap().insert(
            query.to_string(),
            Scripted { delay: Duration::from_millis(delay_ms), result: Err(err) },
        );
        self
    }

    pub fn detail_ok(self, id: &str, delay_ms: u64, record: DetailRecord) -> Self {
        self.details.lock().unwrap().insert(
            id.to_string(),
            Scripted { delay: Duration::from_millis(delay_ms), result: Ok(record) },
        );
        self
    }

    pub fn detail_err(self, id: &str, delay_ms: u64, err: FetchError) -> Self {
        self.details.lock().unwrap().insert(
            id.to_string(),
            Scripted { delay: Duration::from_millis(delay_ms), result: Err(err) },
        );
        self
    }

    /// Requests started, in order ("search:<q>" / "detail:<id>")
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests that ran to completion (were not dropped mid-flight)
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    fn source_name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        self.calls.lock().unwrap().push(format!("search:{}", query));
        let scripted = self.searches.lock().unwrap().get(query).cloned();
        let scripted = scripted.unwrap_or(Scripted {
            delay: Duration::ZERO,
            result: Err(FetchError::not_found("Movie not found!")),
        });
        tokio::time::sleep(scripted.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        scripted.result
    }

    async fn detail(&self, imdb_id: &str) -> Result<DetailRecord, FetchError> {
        self.calls.lock().unwrap().push(format!("detail:{}", imdb_id));
        let scripted = self.details.lock().unwrap().get(imdb_id).cloned();
        let scripted = scripted.unwrap_or(Scripted {
            delay: Duration::ZERO,
            result: Err(FetchError::not_found("Incorrect IMDb ID.")),
        });
        tokio::time::sleep(scripted.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        scripted.result
    }
}

pub fn result(id: &str, title: &str) -> SearchResult {
    SearchResult {
        imdb_id: id.to_string(),
        title: title.to_string(),
        year: "2010".to_string(),
        poster: format!("https://example.com/{}.jpg", id),
    }
}

pub fn record(id: &str, title: &str, runtime: &str, rating: &str) -> DetailRecord {
    DetailRecord {
        imdb_id: Some(id.to_string()),
        title: Some(title.to_string()),
        year: Some("2010".to_string()),
        poster: Some(format!("https://example.com/{}.jpg", id)),
        runtime: Some(runtime.to_string()),
        imdb_rating: Some(rating.to_string()),
        plot: Some("Plot.".to_string()),
        released: Some("16 Jul 2010".to_string()),
        actors: Some("Someone".to_string()),
        director: Some("Somebody".to_string()),
        genre: Some("Drama".to_string()),
    }
}
