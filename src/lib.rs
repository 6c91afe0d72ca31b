pub mod api;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod engine;
mod feedback;
pub mod index;
pub mod loader;
pub mod metrics;
pub mod normalize;
pub mod place;
pub mod ranker;

use crate::place::Place;
use serde::Serialize;
use std::sync::Arc;

/// Place identifiers come from the data export and are unique across all
/// place classes.
pub type PlaceId = i64;

/// One completion candidate: the edit distance between the simple-form
/// query and the place's simple name, plus the place itself.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub distance: usize,
    #[serde(serialize_with = "serialize_place_arc")]
    pub place: Arc<Place>,
}

fn serialize_place_arc<S: serde::Serializer>(
    place: &Arc<Place>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    place.as_ref().serialize(serializer)
}
