use popcorn_sources::{CatalogSource, FetchError, OmdbClient};
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn client_for(server: &MockServer) -> OmdbClient {
    OmdbClient::new(format!("{}/", server.uri()), API_KEY)
}

#[tokio::test]
async fn search_sends_key_and_query_and_maps_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("apikey", API_KEY))
        .and(query_param("s", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Search": [
                {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666", "Type": "movie", "Poster": "https://example.com/a.jpg"},
                {"Title": "Inception: The Cobol Job", "Year": "2010", "imdbID": "tt5295894", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server).search("Inception").await.expect("search ok");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].imdb_id, "tt1375666");
    assert_eq!(results[0].title, "Inception");
    assert_eq!(results[1].poster, "N/A");
}

#[tokio::test]
async fn search_with_response_false_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "xyznotreal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Movie not found!"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).search("xyznotreal").await.unwrap_err();
    assert_eq!(err, FetchError::not_found("Movie not found!"));
    assert_eq!(err.to_string(), "Movie not found!");
}

#[tokio::test]
async fn search_with_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("Inception").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert_eq!(err.to_string(), "Failed to fetch!");
    assert!(err.detail().contains("503"));
}

#[tokio::test]
async fn search_with_malformed_body_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("Inception").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    // Nothing listens on port 9 (discard) in the test environment
    let client = OmdbClient::new("http://127.0.0.1:9/", API_KEY);
    let err = client.search("Inception").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn detail_sends_identifier_and_maps_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("apikey", API_KEY))
        .and(query_param("i", "tt1375666"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Title": "Inception",
            "Year": "2010",
            "Released": "16 Jul 2010",
            "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets through the use of dream-sharing technology.",
            "Poster": "https://example.com/a.jpg",
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Response": "True"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).detail("tt1375666").await.expect("detail ok");
    assert_eq!(record.imdb_id.as_deref(), Some("tt1375666"));
    assert_eq!(record.title.as_deref(), Some("Inception"));
    assert_eq!(record.runtime.as_deref(), Some("148 min"));
    assert_eq!(record.imdb_rating.as_deref(), Some("8.8"));
    assert_eq!(record.director.as_deref(), Some("Christopher Nolan"));
}

#[tokio::test]
async fn detail_for_unknown_id_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Incorrect IMDb ID."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).detail("tt0000000").await.unwrap_err();
    assert_eq!(err, FetchError::not_found("Incorrect IMDb ID."));
}

#[tokio::test]
async fn detail_with_non_ok_status_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "Response": "False",
            "Error": "Invalid API key!"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).detail("tt1375666").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch!");
}
