use crate::PlaceId;
use crate::place::{Class, District, Place};
use std::collections::HashMap;
use std::sync::Arc;

/// The immutable in-memory object graph built once at startup: districts
/// keyed by postcode, places keyed by id, and a side index from street id
/// to its house-number children for narrowing lookups.
#[derive(Debug, Default)]
pub struct Corpus {
    pub(crate) districts: HashMap<String, Arc<District>>,
    pub(crate) places: HashMap<PlaceId, Arc<Place>>,
    pub(crate) house_numbers_by_street: HashMap<PlaceId, Vec<Arc<Place>>>,
    pub(crate) street_count: usize,
    pub(crate) location_count: usize,
    pub(crate) house_number_count: usize,
}

impl Corpus {
    pub fn by_id(&self, id: PlaceId) -> Option<Arc<Place>> {
        self.places.get(&id).cloned()
    }

    /// Resolves an id, optionally narrowed by a house-number string.
    ///
    /// An empty `house_number` addresses the place directly. A non-empty
    /// one only makes sense on a street: its house-number children are
    /// scanned for a literal match. Anything else is a miss.
    pub fn by_id_with_housenumber(&self, id: PlaceId, house_number: &str) -> Option<Arc<Place>> {
        let place = self.by_id(id)?;
        if house_number.is_empty() {
            return Some(place);
        }
        if place.class() != Class::Street {
            return None;
        }
        self.house_numbers_by_street
            .get(&id)?
            .iter()
            .find(|child| child.house_number() == Some(house_number))
            .cloned()
    }

    pub fn places(&self) -> impl Iterator<Item = &Arc<Place>> {
        self.places.values()
    }

    pub fn district(&self, postcode: &str) -> Option<Arc<District>> {
        self.districts.get(postcode).cloned()
    }

    pub fn street_count(&self) -> usize {
        self.street_count
    }

    pub fn location_count(&self) -> usize {
        self.location_count
    }

    pub fn house_number_count(&self) -> usize {
        self.house_number_count
    }
}
