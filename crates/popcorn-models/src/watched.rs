use serde::{Deserialize, Deserializer, Serialize};
use crate::detail::DetailRecord;

/// A title the user has rated and saved.
///
/// Field names on the wire match the stored format of the watched list
/// (`imdbID`, `imdbRating`, `userRating`, ...), so existing data keeps loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    /// Minutes; 0 when the catalog runtime could not be parsed.
    /// Stored lists may hold `null` here for an unparsable runtime.
    #[serde(default, deserialize_with = "runtime_or_zero")]
    pub runtime: u32,
    /// Catalog rating; None when the catalog reported "N/A"
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<f64>,
    /// 0-10, user supplied
    #[serde(rename = "userRating")]
    pub user_rating: f64,
}

impl WatchedEntry {
    /// Build an entry from a fetched record and the user's rating.
    ///
    /// Returns None when the record has no identifier (nothing was fetched yet).
    pub fn from_detail(record: &DetailRecord, user_rating: f64) -> Option<Self> {
        let imdb_id = record.imdb_id.clone().filter(|id| !id.is_empty())?;
        Some(Self {
            imdb_id,
            title: record.title.clone().unwrap_or_default(),
            year: record.year.clone().unwrap_or_default(),
            poster: record.poster.clone().unwrap_or_default(),
            runtime: record.runtime.as_deref().map(parse_runtime_minutes).unwrap_or(0),
            imdb_rating: record.imdb_rating.as_deref().and_then(parse_rating),
            user_rating,
        })
    }
}

/// Leading integer token of a runtime string ("148 min" -> 148), 0 if unparsable
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Whole non-negative minutes, anything else (null, fractions, negatives) as 0
fn runtime_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = Option::<f64>::deserialize(deserializer)?;
    Ok(minutes
        .filter(|m| m.is_finite() && *m >= 0.0 && m.fract() == 0.0 && *m <= f64::from(u32::MAX))
        .map(|m| m as u32)
        .unwrap_or(0))
}

pub fn parse_rating(rating: &str) -> Option<f64> {
    rating.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> DetailRecord {
        DetailRecord {
            imdb_id: Some("tt1375666".to_string()),
            title: Some("Inception".to_string()),
            year: Some("2010".to_string()),
            poster: Some("https://example.com/inception.jpg".to_string()),
            runtime: Some("148 min".to_string()),
            imdb_rating: Some("8.8".to_string()),
            plot: Some("A thief who steals corporate secrets...".to_string()),
            released: Some("16 Jul 2010".to_string()),
            actors: Some("Leonardo DiCaprio, Joseph Gordon-Levitt".to_string()),
            director: Some("Christopher Nolan".to_string()),
            genre: Some("Action, Adventure, Sci-Fi".to_string()),
        }
    }

    #[test]
    fn test_parse_runtime_minutes() {
        assert_eq!(parse_runtime_minutes("148 min"), 148);
        assert_eq!(parse_runtime_minutes("90"), 90);
        assert_eq!(parse_runtime_minutes("N/A"), 0);
        assert_eq!(parse_runtime_minutes(""), 0);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("8.8"), Some(8.8));
        assert_eq!(parse_rating(" 7 "), Some(7.0));
        assert_eq!(parse_rating("N/A"), None);
        assert_eq!(parse_rating("NaN"), None);
    }

    #[test]
    fn test_from_detail() {
        let entry = WatchedEntry::from_detail(&inception(), 8.0).unwrap();
        assert_eq!(entry.imdb_id, "tt1375666");
        assert_eq!(entry.title, "Inception");
        assert_eq!(entry.runtime, 148);
        assert_eq!(entry.imdb_rating, Some(8.8));
        assert_eq!(entry.user_rating, 8.0);
    }

    #[test]
    fn test_from_detail_without_id() {
        assert!(WatchedEntry::from_detail(&DetailRecord::default(), 5.0).is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let entry = WatchedEntry::from_detail(&inception(), 8.0).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["imdbID"], "tt1375666");
        assert_eq!(json["imdbRating"], 8.8);
        assert_eq!(json["userRating"], 8.0);
        assert_eq!(json["runtime"], 148);
    }

    #[test]
    fn test_unknown_runtime_deserializes_as_zero() {
        for runtime in ["null", "-5", "90.5"] {
            let json = format!(
                r#"{{"imdbID":"tt1","title":"T","year":"2000","poster":"","runtime":{},"userRating":3}}"#,
                runtime
            );
            let entry: WatchedEntry = serde_json::from_str(&json).unwrap();
            assert_eq!(entry.runtime, 0, "runtime {}", runtime);
        }

        let json = r#"{"imdbID":"tt1","title":"T","year":"2000","poster":"","userRating":3}"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.runtime, 0);

        let json = r#"{"imdbID":"tt1","title":"T","year":"2000","poster":"","runtime":148,"userRating":3}"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.runtime, 148);
    }

    #[test]
    fn test_missing_imdb_rating_deserializes() {
        let json = r#"{"imdbID":"tt1","title":"T","year":"2000","poster":"","runtime":0,"userRating":3}"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.imdb_rating, None);
        assert_eq!(entry.user_rating, 3.0);
    }
}
