pub mod detail;
pub mod search_result;
pub mod summary;
pub mod watched;

pub use detail::DetailRecord;
pub use search_result::SearchResult;
pub use summary::WatchedSummary;
pub use watched::{parse_rating, parse_runtime_minutes, WatchedEntry};
