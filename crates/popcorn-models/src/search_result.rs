use serde::{Deserialize, Serialize};

/// One row of a catalog search. Replaced wholesale on every successful search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
}
