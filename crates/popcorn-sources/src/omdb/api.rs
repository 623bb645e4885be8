use popcorn_models::{DetailRecord, SearchResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbDetail {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        SearchResult {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster: item.poster,
        }
    }
}

impl From<OmdbDetail> for DetailRecord {
    fn from(detail: OmdbDetail) -> Self {
        DetailRecord {
            imdb_id: detail.imdb_id,
            title: detail.title,
            year: detail.year,
            poster: detail.poster,
            runtime: detail.runtime,
            imdb_rating: detail.imdb_rating,
            plot: detail.plot,
            released: detail.released,
            actors: detail.actors,
            director: detail.director,
            genre: detail.genre,
        }
    }
}

/// `Response` is the string "True" or "False" in every payload
fn is_false(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

async fn get_json<T>(client: &Client, endpoint: &str, params: &[(&str, &str)]) -> Result<T, FetchError>
where
    T: for<'de> Deserialize<'de>,
{
    let response = client.get(endpoint).query(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(FetchError::transport(format!("{} - {}", status, error_text)));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| FetchError::transport(format!("malformed catalog response: {}", e)))
}

/// Search the catalog by title
pub async fn search(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, FetchError> {
    let payload: OmdbSearchResponse =
        get_json(client, endpoint, &[("apikey", api_key), ("s", query)]).await?;

    if is_false(&payload.response) {
        let message = payload.error.unwrap_or_else(|| "Movie not found!".to_string());
        debug!(query = %query, message = %message, "Catalog search returned no matches");
        return Err(FetchError::not_found(message));
    }

    Ok(payload.search.into_iter().map(SearchResult::from).collect())
}

/// Fetch the full record for one identifier
pub async fn get_detail(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<DetailRecord, FetchError> {
    let payload: OmdbDetail =
        get_json(client, endpoint, &[("apikey", api_key), ("i", imdb_id)]).await?;

    if payload.response.as_deref().map(is_false).unwrap_or(false) {
        let message = payload.error.clone().unwrap_or_else(|| "Incorrect IMDb ID.".to_string());
        debug!(imdb_id = %imdb_id, message = %message, "Catalog has no record for id");
        return Err(FetchError::not_found(message));
    }

    Ok(DetailRecord::from(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_payload_maps_to_results() {
        let json = r#"{
            "Search": [
                {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666", "Type": "movie", "Poster": "https://example.com/p.jpg"}
            ],
            "totalResults": "1",
            "Response": "True"
        }"#;
        let payload: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert!(!is_false(&payload.response));
        let results: Vec<SearchResult> = payload.search.into_iter().map(SearchResult::from).collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].imdb_id, "tt1375666");
        assert_eq!(results[0].year, "2010");
    }

    #[test]
    fn test_not_found_payload_has_no_results() {
        let json = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let payload: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert!(is_false(&payload.response));
        assert!(payload.search.is_empty());
        assert_eq!(payload.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_detail_payload_maps_to_record() {
        let json = r#"{
            "Title": "Inception", "Year": "2010", "Released": "16 Jul 2010", "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi", "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio", "Plot": "Dreams.", "Poster": "N/A",
            "imdbRating": "8.8", "imdbID": "tt1375666", "Response": "True"
        }"#;
        let payload: OmdbDetail = serde_json::from_str(json).unwrap();
        let record = DetailRecord::from(payload);
        assert_eq!(record.title.as_deref(), Some("Inception"));
        assert_eq!(record.runtime.as_deref(), Some("148 min"));
        assert_eq!(record.poster.as_deref(), Some("N/A"));
        assert_eq!(record.imdb_id.as_deref(), Some("tt1375666"));
    }
}
