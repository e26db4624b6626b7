use std::collections::HashMap;

use tokio::sync::Mutex;

use super::{SearchCountStore, StoreError};
use crate::api::types::{Movie, TrendingEntry};

/// Session-local search counts; nothing survives the process.
pub struct MemoryStore {
    image_base: String,
    records: Mutex<HashMap<String, TrendingEntry>>,
}

impl MemoryStore {
    pub fn new(image_base: impl Into<String>) -> Self {
        Self {
            image_base: image_base.into(),
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl SearchCountStore for MemoryStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let next_id = records.len() + 1;
        records
            .entry(term.to_string())
            .and_modify(|entry| entry.count += 1)
            .or_insert_with(|| TrendingEntry {
                id: format!("mem-{next_id}"),
                search_term: term.to_string(),
                count: 1,
                movie_id: movie.id,
                poster_url: movie.poster_url(&self.image_base),
            });
        Ok(())
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        let records = self.records.lock().await;
        let mut entries: Vec<TrendingEntry> = records.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.search_term.cmp(&b.search_term))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, poster: Option<&str>) -> Movie {
        Movie {
            id,
            title: format!("movie {id}"),
            original_title: None,
            vote_average: None,
            poster_path: poster.map(str::to_string),
            release_date: None,
            original_language: "en".into(),
            overview: None,
        }
    }

    #[tokio::test]
    async fn first_search_creates_record() {
        let store = MemoryStore::new("https://img");
        store
            .record_search("batman", &movie(268, Some("/b.jpg")))
            .await
            .unwrap();

        let top = store.trending(5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].search_term, "batman");
        assert_eq!(top[0].count, 1);
        assert_eq!(top[0].movie_id, 268);
        assert_eq!(top[0].poster_url.as_deref(), Some("https://img/w500/b.jpg"));
    }

    #[tokio::test]
    async fn repeat_search_increments_and_keeps_first_movie() {
        let store = MemoryStore::new("https://img");
        store.record_search("dune", &movie(1, None)).await.unwrap();
        store.record_search("dune", &movie(2, None)).await.unwrap();

        let top = store.trending(5).await.unwrap();
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].movie_id, 1);
    }

    #[tokio::test]
    async fn trending_orders_by_count_and_truncates() {
        let store = MemoryStore::new("https://img");
        for term in ["a", "b", "b", "c", "c", "c"] {
            store.record_search(term, &movie(1, None)).await.unwrap();
        }

        let top = store.trending(2).await.unwrap();
        let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();
        assert_eq!(terms, vec!["c", "b"]);
    }
}
