use async_trait::async_trait;
use popcorn_models::{DetailRecord, SearchResult};
use crate::error::FetchError;

/// Remote movie catalog.
///
/// Implementations do not retry and do not time out on their own; callers cancel
/// a request by dropping its future.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Titles matching `query`
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError>;

    /// Full record for one identifier
    async fn detail(&self, imdb_id: &str) -> Result<DetailRecord, FetchError>;
}
