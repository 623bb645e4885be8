use crate::error::FetchError;
use crate::omdb::api;
use crate::traits::CatalogSource;
use async_trait::async_trait;
use popcorn_config::CatalogConfig;
use popcorn_models::{DetailRecord, SearchResult};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

fn create_omdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// OMDb-compatible catalog client. The API key is fixed at construction.
#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    endpoint: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(create_omdb_client()),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.endpoint.trim(), config.api_key.trim())
    }
}

#[async_trait]
impl CatalogSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        debug!(query = %query, "Searching catalog");
        api::search(&self.client, &self.endpoint, &self.api_key, query).await
    }

    async fn detail(&self, imdb_id: &str) -> Result<DetailRecord, FetchError> {
        debug!(imdb_id = %imdb_id, "Fetching catalog record");
        api::get_detail(&self.client, &self.endpoint, &self.api_key, imdb_id).await
    }
}
