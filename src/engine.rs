use crate::PlaceId;
use crate::SearchResult;
use crate::cache::ResultCache;
use crate::corpus::Corpus;
use crate::feedback::{self, FeedbackJob};
use crate::index::{PrefixIndex, candidate_pool};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::normalize::simplify;
use crate::place::Place;
use crate::ranker::Ranker;
use crossbeam_channel::{Sender, TrySendError, bounded};
use log::{debug, info};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Tunables of the completion engine. The defaults match the values the
/// service has been operated with.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum precomputed prefix depth (L).
    pub max_prefix_length: usize,
    /// Target reply size and completion-slot capacity (M).
    pub min_completion_count: usize,
    /// Minimum input length for the edit-distance fallback (F).
    pub min_lev: usize,
    /// Distance gap beyond which distance dominates ranking (C).
    pub distance_cut: usize,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub feedback_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_prefix_length: 8,
            min_completion_count: 5,
            min_lev: 4,
            distance_cut: 4,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 10_000,
            feedback_queue_capacity: 1024,
        }
    }
}

pub(crate) struct EngineInner {
    pub(crate) corpus: Corpus,
    pub(crate) pool: Vec<Arc<Place>>,
    pub(crate) index: PrefixIndex,
    pub(crate) ranker: Ranker,
    pub(crate) cache: ResultCache,
    pub(crate) metrics: Metrics,
    pub(crate) min_lev: usize,
    /// Serializes completion-list writers; readers never take it.
    pub(crate) refresh_lock: Mutex<()>,
}

/// The query coordinator: classifies each query into one of the four
/// regimes, dispatches to the right candidate set, and feeds the cache
/// and the relevance loop.
pub struct Engine {
    inner: Arc<EngineInner>,
    feedback: Sender<FeedbackJob>,
}

impl Engine {
    pub fn new(corpus: Corpus, config: EngineConfig) -> Self {
        let pool = candidate_pool(&corpus);
        let index = PrefixIndex::build(&pool, config.max_prefix_length, config.min_completion_count);
        info!(
            "[ENGINE] ready: {} candidates, {} prefixes",
            pool.len(),
            index.len()
        );

        let inner = Arc::new(EngineInner {
            corpus,
            pool,
            index,
            ranker: Ranker {
                min_completion_count: config.min_completion_count,
                distance_cut: config.distance_cut,
            },
            cache: ResultCache::new(config.cache_capacity, config.cache_ttl),
            metrics: Metrics::new(),
            min_lev: config.min_lev,
            refresh_lock: Mutex::new(()),
        });

        let (tx, rx) = bounded(config.feedback_queue_capacity);
        let worker_inner = inner.clone();
        thread::Builder::new()
            .name("feedback".to_string())
            .spawn(move || feedback::run(worker_inner, rx))
            .expect("failed to spawn feedback worker");

        Self {
            inner,
            feedback: tx,
        }
    }

    /// Returns a ranked list of candidate places for a free-text
    /// fragment. Never blocks on I/O; the relevance update and the cache
    /// insert it triggers are fire-and-forget.
    pub fn complete(&self, input: &str) -> Arc<Vec<SearchResult>> {
        let _timer = self.inner.metrics.start_query();

        let query = simplify(input);
        let length = query.chars().count();
        if length == 0 {
            return Arc::new(Vec::new());
        }
        debug!("[QUERY] '{input}' -> '{query}' (length {length})");

        if let Some(results) = self.inner.cache.get(&query) {
            self.schedule(FeedbackJob::results(query, results.clone(), None));
            return results;
        }

        let inner = &self.inner;
        let max_prefix_length = inner.index.max_prefix_length();

        if length >= max_prefix_length {
            let key: String = query.chars().take(max_prefix_length).collect();
            let results = match inner.index.get(&key) {
                // long query, known prefix: distance over that prefix's candidates
                Some(entry) => {
                    let snapshot = entry.snapshot();
                    debug!(
                        "[QUERY] prefix '{key}' scopes {} candidates",
                        snapshot.candidates.len()
                    );
                    Arc::new(
                        inner
                            .ranker
                            .rank(snapshot.candidates.iter().cloned(), &query),
                    )
                }
                // typo within the first L characters: fall back to the pool
                None => {
                    debug!("[QUERY] prefix '{key}' unknown, ranking full pool");
                    Arc::new(inner.ranker.rank(inner.pool.iter().cloned(), &query))
                }
            };
            self.schedule(FeedbackJob::results(
                query.clone(),
                results.clone(),
                Some(query),
            ));
            return results;
        }

        // short query, known prefix: serve the precomputed completions
        if let Some(entry) = inner.index.get(&query) {
            let completions = entry.snapshot().completions.clone();
            debug!("[QUERY] serving {} precomputed completions", completions.len());
            self.schedule(FeedbackJob::results(query, completions.clone(), None));
            return completions;
        }

        // short query, unknown prefix: edit distance over the pool, if
        // the input is long enough to be worth it
        if length >= inner.min_lev {
            let results = Arc::new(inner.ranker.rank(inner.pool.iter().cloned(), &query));
            self.schedule(FeedbackJob::results(
                query.clone(),
                results.clone(),
                Some(query),
            ));
            return results;
        }

        Arc::new(Vec::new())
    }

    /// Resolves a place by id, optionally narrowed by a house-number
    /// string (see [`Corpus::by_id_with_housenumber`]).
    pub fn lookup(&self, id: PlaceId, house_number: &str) -> Option<Arc<Place>> {
        self.inner.corpus.by_id_with_housenumber(id, house_number)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        let inner = &self.inner;
        MetricsSnapshot {
            street_count: inner.corpus.street_count(),
            location_count: inner.corpus.location_count(),
            house_number_count: inner.corpus.house_number_count(),
            prefix_count: inner.index.len(),
            cache: inner.cache.stats(),
            query_count: inner.metrics.query_count(),
            avg_query_micros: inner.metrics.avg_query_micros(),
        }
    }

    /// Blocks until every feedback job scheduled before this call has
    /// been applied. For callers that need read-your-writes, e.g. tests.
    pub fn flush_feedback(&self) {
        let (ack_tx, ack_rx) = bounded(1);
        if self.feedback.send(FeedbackJob::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv_timeout(Duration::from_secs(5));
        }
    }

    fn schedule(&self, job: FeedbackJob) {
        match self.feedback.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("[FEEDBACK] queue full, dropping update");
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("[FEEDBACK] worker gone, dropping update");
            }
        }
    }
}
