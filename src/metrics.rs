use crate::cache::CacheStats;
use log::debug;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Lock-free query counters, fed by a guard that records on drop.
#[derive(Debug, Default)]
pub struct Metrics {
    query_count: AtomicU64,
    query_micros_total: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing one query; the returned guard records the duration
    /// when it goes out of scope, so every return path is covered.
    pub fn start_query(&self) -> QueryTimer<'_> {
        QueryTimer {
            start: Instant::now(),
            metrics: self,
        }
    }

    pub fn record_query(&self, micros: u64) {
        self.query_count.fetch_add(1, Ordering::Relaxed);
        self.query_micros_total.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    /// Average query duration in microseconds over the process lifetime.
    pub fn avg_query_micros(&self) -> u64 {
        let count = self.query_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0;
        }
        self.query_micros_total.load(Ordering::Relaxed) / count
    }
}

pub struct QueryTimer<'a> {
    start: Instant,
    metrics: &'a Metrics,
}

impl Drop for QueryTimer<'_> {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        self.metrics.record_query(micros);
        debug!("[TIMING] query took {micros}µs");
    }
}

/// The `/metrics` response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub street_count: usize,
    pub location_count: usize,
    pub house_number_count: usize,
    pub prefix_count: usize,
    pub cache: CacheStats,
    pub query_count: u64,
    pub avg_query_micros: u64,
}
