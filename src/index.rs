use crate::SearchResult;
use crate::corpus::Corpus;
use crate::place::{Class, Place, pool_order};
use arc_swap::ArcSwap;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

/// The global fallback set for edit distance: every street and location,
/// sorted by simple-name length then lexicographically. House numbers are
/// lookup targets only and never appear here.
pub fn candidate_pool(corpus: &Corpus) -> Vec<Arc<Place>> {
    let mut pool: Vec<Arc<Place>> = corpus
        .places()
        .filter(|p| matches!(p.class(), Class::Street | Class::Location))
        .cloned()
        .collect();
    pool.sort_by(|a, b| pool_order(a, b));
    pool
}

/// The two per-prefix slots, published together so readers never observe
/// a half-updated pair.
#[derive(Debug)]
pub struct PrefixLists {
    /// Candidates to run edit distance against. At the maximum depth this
    /// is every pool member under the prefix; at shorter depths it mirrors
    /// the completion slot and only feeds `refresh_completions`.
    pub candidates: Vec<Arc<Place>>,
    /// Precomputed suggestions served verbatim for short queries. Shared
    /// as one allocation because whole lists are handed to callers.
    pub completions: Arc<Vec<SearchResult>>,
}

/// One prefix key's entry. Readers snapshot, the feedback writer swaps.
#[derive(Debug)]
pub struct PrefixEntry {
    lists: ArcSwap<PrefixLists>,
}

impl PrefixEntry {
    fn new(candidates: Vec<Arc<Place>>, completions: Vec<SearchResult>) -> Self {
        Self {
            lists: ArcSwap::from_pointee(PrefixLists {
                candidates,
                completions: Arc::new(completions),
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<PrefixLists> {
        self.lists.load_full()
    }

    pub fn publish(&self, candidates: Vec<Arc<Place>>, completions: Vec<SearchResult>) {
        self.lists.store(Arc::new(PrefixLists {
            candidates,
            completions: Arc::new(completions),
        }));
    }
}

/// Precomputed mapping from every occurring simple-form prefix of length
/// 1..=L to its entry. The key set is fixed after construction; only the
/// list pairs inside entries are ever replaced.
#[derive(Debug)]
pub struct PrefixIndex {
    entries: HashMap<String, PrefixEntry>,
    max_prefix_length: usize,
}

impl PrefixIndex {
    /// Walks the pool once per depth. A candidate contributes under the
    /// depth-d key only while its simple name is at least d long; shorter
    /// names were already fully indexed under their own full-name key.
    pub fn build(
        pool: &[Arc<Place>],
        max_prefix_length: usize,
        min_completion_count: usize,
    ) -> Self {
        #[derive(Default)]
        struct Slots {
            candidates: Vec<Arc<Place>>,
            completions: Vec<SearchResult>,
        }

        let mut slots: HashMap<String, Slots> = HashMap::new();
        for depth in 1..=max_prefix_length {
            for place in pool {
                let name_len = place.simple_len();
                if name_len < depth {
                    continue;
                }
                let key: String = place.simple_name.chars().take(depth).collect();
                let slot = slots.entry(key).or_default();
                let remainder = name_len - depth;

                if depth == max_prefix_length {
                    slot.candidates.push(place.clone());
                } else if remainder == 0 {
                    // exact candidates are kept even when the slot is full
                    slot.candidates.push(place.clone());
                    slot.completions.push(SearchResult {
                        distance: 0,
                        place: place.clone(),
                    });
                } else if slot.completions.len() < min_completion_count {
                    slot.candidates.push(place.clone());
                    slot.completions.push(SearchResult {
                        distance: remainder,
                        place: place.clone(),
                    });
                }
            }
        }

        let entries: HashMap<String, PrefixEntry> = slots
            .into_iter()
            .map(|(key, slot)| (key, PrefixEntry::new(slot.candidates, slot.completions)))
            .collect();

        info!(
            "[INDEX] {} prefix entries over {} candidates (max depth {})",
            entries.len(),
            pool.len(),
            max_prefix_length
        );

        Self {
            entries,
            max_prefix_length,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PrefixEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_prefix_length(&self) -> usize {
        self.max_prefix_length
    }
}
