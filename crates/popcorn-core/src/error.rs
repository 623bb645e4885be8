use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{key}' from storage: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{key}' to storage: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// Stored bytes exist but do not decode; never treated as "no data"
    #[error("stored value for '{key}' is corrupt: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("no title is selected")]
    NoSelection,
    #[error("the selected title has not finished loading")]
    NotLoaded,
    #[error("rate the title before adding it to the watched list")]
    RatingRequired,
    #[error("rating must be between 0 and 10, got {0}")]
    InvalidRating(f64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
