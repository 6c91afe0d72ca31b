use crate::SearchResult;
use crate::place::{Class, Place};
use std::cmp::Ordering;
use std::sync::Arc;

/// Classic Levenshtein distance over code points, single-row DP.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, &bc) in b_chars.iter().enumerate() {
            let up = row[j + 1];
            let cost = usize::from(ac != bc);
            row[j + 1] = (up + 1).min(row[j] + 1).min(prev + cost);
            prev = up;
        }
    }
    row[b_chars.len()]
}

/// Scores and orders candidates against a simple-form query.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    /// Target reply size (M).
    pub min_completion_count: usize,
    /// Distance gap beyond which distance dominates relevance (C).
    pub distance_cut: usize,
}

impl Ranker {
    /// Full ordering used everywhere a result list is (re)built:
    ///
    /// 1. an exact match beats any non-exact one
    /// 2. distances further apart than the cut: smaller distance wins
    /// 3. higher relevance wins
    /// 4. smaller residual distance wins
    /// 5. streets beat locations
    /// 6. among streets, the longer one wins
    pub fn compare(&self, a: &SearchResult, b: &SearchResult) -> Ordering {
        let exact_a = a.distance == 0;
        let exact_b = b.distance == 0;
        if exact_a != exact_b {
            return if exact_a {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if a.distance.abs_diff(b.distance) > self.distance_cut {
            return a.distance.cmp(&b.distance);
        }
        let relevance = b.place.relevance().cmp(&a.place.relevance());
        if relevance != Ordering::Equal {
            return relevance;
        }
        let distance = a.distance.cmp(&b.distance);
        if distance != Ordering::Equal {
            return distance;
        }
        let class = class_rank(&a.place).cmp(&class_rank(&b.place));
        if class != Ordering::Equal {
            return class;
        }
        b.place.street_length().cmp(&a.place.street_length())
    }

    /// Computes distances for every candidate and sorts, without
    /// truncating. `refresh_completions` needs the full ordering.
    pub fn score<I>(&self, candidates: I, query: &str) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = Arc<Place>>,
    {
        let mut results: Vec<SearchResult> = candidates
            .into_iter()
            .map(|place| SearchResult {
                distance: levenshtein(query, &place.simple_name),
                place,
            })
            .collect();
        results.sort_by(|a, b| self.compare(a, b));
        results
    }

    /// Scores, sorts and truncates to the reply size, keeping every
    /// trailing exact match beyond the cap.
    pub fn rank<I>(&self, candidates: I, query: &str) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = Arc<Place>>,
    {
        let mut results = self.score(candidates, query);
        truncate_with_exact(&mut results, self.min_completion_count);
        results
    }
}

fn class_rank(place: &Place) -> u8 {
    match place.class() {
        Class::Street => 0,
        Class::Location => 1,
        Class::HouseNumber => 2,
    }
}

/// Cuts a sorted result list down to `cap` entries, then re-extends it
/// with any directly trailing exact matches. Every exact match that the
/// sort placed adjacent to the cap survives; the first non-exact trailing
/// element stops the extension.
pub fn truncate_with_exact(results: &mut Vec<SearchResult>, cap: usize) {
    if results.len() <= cap {
        return;
    }
    let mut keep = cap;
    while keep < results.len() && results[keep].distance == 0 {
        keep += 1;
    }
    results.truncate(keep);
}
