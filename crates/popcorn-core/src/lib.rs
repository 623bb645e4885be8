pub mod collection;
pub mod detail_sync;
pub mod error;
pub mod keys;
pub mod label;
pub mod search_sync;
pub mod storage;

pub use collection::{Keyed, PersistedCollection, WatchedCollection};
pub use detail_sync::{DetailState, DetailSync};
pub use error::{DetailError, StorageError};
pub use keys::{KeyEvents, KeySubscription};
pub use label::{DisplayLabel, LabelCell, TitleGuard};
pub use search_sync::{SearchState, SearchSync};
pub use storage::{open_watched, FileStore, KeyValueStore, MemoryStore};
