pub mod appwrite;
pub mod memory;

use thiserror::Error;

use crate::api::types::{Movie, TrendingEntry};
use appwrite::AppwriteStore;
use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store error (status {status}): {detail}")]
    Status { status: u16, detail: String },
    #[error("deserialization error: {0}")]
    Deserialize(String),
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Aggregates how often each search term was used and which movie topped it.
///
/// Uses `trait_variant::make` so spawned tasks can rely on `Send` futures.
#[trait_variant::make(SearchCountStore: Send)]
pub trait LocalSearchCountStore {
    /// Count one more use of `term`, creating the record (with `movie` as its
    /// representative) the first time the term is seen.
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), StoreError>;

    /// The `limit` most used terms, highest count first.
    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError>;
}

/// The configured store backend.
pub enum StoreBackend {
    Memory(MemoryStore),
    Appwrite(AppwriteStore),
}

impl SearchCountStore for StoreBackend {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => SearchCountStore::record_search(store, term, movie).await,
            Self::Appwrite(store) => SearchCountStore::record_search(store, term, movie).await,
        }
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        match self {
            Self::Memory(store) => SearchCountStore::trending(store, limit).await,
            Self::Appwrite(store) => SearchCountStore::trending(store, limit).await,
        }
    }
}
