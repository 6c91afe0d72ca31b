use crate::SearchResult;
use crate::engine::EngineInner;
use crate::place::{Place, dedup_by_id};
use crate::ranker::truncate_with_exact;
use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;

/// Work items for the relevance worker. Queries enqueue `Results` after
/// returning; `Flush` is a rendezvous for callers that need to observe
/// prior updates.
pub(crate) enum FeedbackJob {
    Results {
        query: String,
        results: Arc<Vec<SearchResult>>,
        /// When set, the result list is inserted into the cache under
        /// this key after the relevance pass.
        cache_key: Option<String>,
    },
    Flush(Sender<()>),
}

impl FeedbackJob {
    pub(crate) fn results(
        query: String,
        results: Arc<Vec<SearchResult>>,
        cache_key: Option<String>,
    ) -> Self {
        FeedbackJob::Results {
            query,
            results,
            cache_key,
        }
    }
}

/// Drains the feedback queue until every sender is gone.
pub(crate) fn run(inner: Arc<EngineInner>, jobs: Receiver<FeedbackJob>) {
    for job in jobs.iter() {
        match job {
            FeedbackJob::Results {
                query,
                results,
                cache_key,
            } => process(&inner, &query, results, cache_key),
            FeedbackJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("[FEEDBACK] worker stopped");
}

fn process(
    inner: &EngineInner,
    query: &str,
    results: Arc<Vec<SearchResult>>,
    cache_key: Option<String>,
) {
    let mut confirmed: Vec<Arc<Place>> = Vec::new();
    for result in results.iter() {
        if result.place.simple_name == query {
            result.place.bump_relevance();
            confirmed.push(result.place.clone());
        }
    }

    let confirmed = dedup_by_id(confirmed);
    if !confirmed.is_empty() {
        debug!("[FEEDBACK] '{query}' confirmed {} place(s)", confirmed.len());
        refresh_completions(inner, &confirmed);
    }

    if let Some(key) = cache_key {
        inner.cache.insert(key, results);
    }
}

/// Re-ranks the completion slot of every proper prefix of the confirmed
/// simple name, so confirmed places bubble up the suggestion lists. New
/// list pairs are built off to the side and published with one swap per
/// entry; readers keep working on their snapshots.
fn refresh_completions(inner: &EngineInner, confirmed: &[Arc<Place>]) {
    // all confirmed places share one simple name: they matched the same query
    let simple = &confirmed[0].simple_name;
    let name_len = simple.chars().count();
    let top = inner.index.max_prefix_length().min(name_len);

    let _guard = inner.refresh_lock.lock().unwrap();
    for depth in 1..top {
        let key: String = simple.chars().take(depth).collect();
        let Some(entry) = inner.index.get(&key) else {
            continue;
        };

        let snapshot = entry.snapshot();
        let mut merged = snapshot.candidates.clone();
        merged.extend(confirmed.iter().cloned());
        let merged = dedup_by_id(merged);

        let scored = inner.ranker.score(merged, &key);
        let mut completions = scored.clone();
        truncate_with_exact(&mut completions, inner.ranker.min_completion_count);
        let candidates: Vec<Arc<Place>> = scored.into_iter().map(|r| r.place).collect();

        entry.publish(candidates, completions);
        debug!("[FEEDBACK] refreshed completions under '{key}'");
    }
}
