use serde::{Deserialize, Serialize};

/// Full catalog record for a single title.
///
/// Every field is optional: the default value is the empty record shown before the
/// first successful detail fetch. The catalog reports missing values as `"N/A"`, which
/// is kept verbatim here and only interpreted when a `WatchedEntry` is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailRecord {
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
    /// e.g. "148 min"
    pub runtime: Option<String>,
    /// Numeric string, e.g. "8.8"
    pub imdb_rating: Option<String>,
    pub plot: Option<String>,
    pub released: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
}

impl DetailRecord {
    pub fn is_empty(&self) -> bool {
        *self == DetailRecord::default()
    }

    /// Title if present and non-blank
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}
