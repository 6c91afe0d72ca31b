use crate::SearchResult;
use log::debug;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Bounded TTL cache from simple-form query to its result list. Values
/// are `Arc`-shared and immutable; only the relevance counters of the
/// places a list references ever change.
pub struct ResultCache {
    inner: moka::sync::Cache<String, Arc<Vec<SearchResult>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub entries: u64,
}

impl ResultCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: moka::sync::Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
        }
    }

    pub fn get(&self, query: &str) -> Option<Arc<Vec<SearchResult>>> {
        match self.inner.get(query) {
            Some(results) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("[CACHE] hit for '{query}'");
                Some(results)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Concurrent misses may both insert; the lists are equivalent, so
    /// whichever lands last simply wins.
    pub fn insert(&self, query: String, results: Arc<Vec<SearchResult>>) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.inner.insert(query, results);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            entries: self.inner.entry_count(),
        }
    }
}
