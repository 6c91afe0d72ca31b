use crate::PlaceId;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// A postal district. Immutable after load, shared by every place in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct District {
    pub postcode: String,
    pub name: String,
}

/// Place classes as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Street,
    Location,
    HouseNumber,
}

impl Class {
    pub fn as_str(self) -> &'static str {
        match self {
            Class::Street => "street",
            Class::Location => "location",
            Class::HouseNumber => "houseNumber",
        }
    }
}

/// Class-specific payload. Children reference their street by id plus a
/// denormalized copy of its name (streets never change after load), so
/// serializing a place needs no corpus access and no back-pointer.
#[derive(Debug)]
pub enum PlaceKind {
    Street {
        /// Street length in meters, a prominence signal for ranking.
        length: i64,
    },
    Location {
        location_type: String,
        street_id: PlaceId,
        street_name: String,
        house_number: String,
    },
    HouseNumber {
        street_id: PlaceId,
        street_name: String,
        house_number: String,
    },
}

/// A street, a named location or a building house number, anchored to a
/// district. The relevance counter is the only mutable field.
#[derive(Debug)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    /// Simple form of `name`; empty for house numbers.
    pub simple_name: String,
    pub district: Arc<District>,
    pub lat: f64,
    pub lon: f64,
    pub relevance: AtomicU64,
    pub kind: PlaceKind,
}

impl Place {
    pub fn class(&self) -> Class {
        match self.kind {
            PlaceKind::Street { .. } => Class::Street,
            PlaceKind::Location { .. } => Class::Location,
            PlaceKind::HouseNumber { .. } => Class::HouseNumber,
        }
    }

    pub fn relevance(&self) -> u64 {
        self.relevance.load(AtomicOrdering::Relaxed)
    }

    /// Atomically bumps the relevance counter, returning the new value.
    pub fn bump_relevance(&self) -> u64 {
        self.relevance.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }

    /// Street length for streets, zero for everything else.
    pub fn street_length(&self) -> i64 {
        match self.kind {
            PlaceKind::Street { length } => length,
            _ => 0,
        }
    }

    pub fn house_number(&self) -> Option<&str> {
        match &self.kind {
            PlaceKind::Street { .. } => None,
            PlaceKind::Location { house_number, .. }
            | PlaceKind::HouseNumber { house_number, .. } => Some(house_number),
        }
    }

    /// Code-point length of the simple name.
    pub fn simple_len(&self) -> usize {
        self.simple_name.chars().count()
    }
}

/// Candidate-pool order: simple-name length ascending, then simple-name
/// lexicographic, then id to keep the order deterministic across runs.
pub fn pool_order(a: &Place, b: &Place) -> Ordering {
    a.simple_len()
        .cmp(&b.simple_len())
        .then_with(|| a.simple_name.cmp(&b.simple_name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Removes duplicate places by id, preserving the first occurrence.
pub fn dedup_by_id(places: Vec<Arc<Place>>) -> Vec<Arc<Place>> {
    let mut seen: HashSet<PlaceId> = HashSet::with_capacity(places.len());
    places.into_iter().filter(|p| seen.insert(p.id)).collect()
}

// The JSON shape is class-dependent: streets carry a length, children
// carry their street and house number. Fields that do not apply to a
// class are omitted rather than serialized empty.
impl Serialize for Place {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            PlaceKind::Street { length } => {
                let mut s = serializer.serialize_struct("Place", 9)?;
                s.serialize_field("id", &self.id)?;
                s.serialize_field("class", self.class().as_str())?;
                s.serialize_field("name", &self.name)?;
                s.serialize_field("postcode", &self.district.postcode)?;
                s.serialize_field("district", &self.district.name)?;
                s.serialize_field("length", length)?;
                s.serialize_field("lat", &self.lat)?;
                s.serialize_field("lon", &self.lon)?;
                s.serialize_field("relevance", &self.relevance())?;
                s.end()
            }
            PlaceKind::Location {
                location_type,
                street_id,
                street_name,
                house_number,
            } => {
                let mut s = serializer.serialize_struct("Place", 12)?;
                s.serialize_field("id", &self.id)?;
                s.serialize_field("class", self.class().as_str())?;
                s.serialize_field("type", location_type)?;
                s.serialize_field("name", &self.name)?;
                s.serialize_field("street", street_name)?;
                s.serialize_field("streetID", street_id)?;
                s.serialize_field("houseNumber", house_number)?;
                s.serialize_field("postcode", &self.district.postcode)?;
                s.serialize_field("district", &self.district.name)?;
                s.serialize_field("lat", &self.lat)?;
                s.serialize_field("lon", &self.lon)?;
                s.serialize_field("relevance", &self.relevance())?;
                s.end()
            }
            PlaceKind::HouseNumber {
                street_id,
                street_name,
                house_number,
            } => {
                let mut s = serializer.serialize_struct("Place", 10)?;
                s.serialize_field("id", &self.id)?;
                s.serialize_field("class", self.class().as_str())?;
                s.serialize_field("street", street_name)?;
                s.serialize_field("streetID", street_id)?;
                s.serialize_field("houseNumber", house_number)?;
                s.serialize_field("postcode", &self.district.postcode)?;
                s.serialize_field("district", &self.district.name)?;
                s.serialize_field("lat", &self.lat)?;
                s.serialize_field("lon", &self.lon)?;
                s.serialize_field("relevance", &self.relevance())?;
                s.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::simplify;

    fn district() -> Arc<District> {
        Arc::new(District {
            postcode: "12524".to_string(),
            name: "Treptow-Köpenick".to_string(),
        })
    }

    fn street(id: PlaceId, name: &str, length: i64) -> Arc<Place> {
        Arc::new(Place {
            id,
            name: name.to_string(),
            simple_name: simplify(name),
            district: district(),
            lat: 52.5,
            lon: 13.4,
            relevance: AtomicU64::new(0),
            kind: PlaceKind::Street { length },
        })
    }

    #[test]
    fn test_pool_order_by_length_then_lex() {
        let short = street(1, "Kurz", 10);
        let long = street(2, "Aalemannufer", 10);
        let lex_a = street(3, "Adler", 10);
        let lex_b = street(4, "Bären", 10);

        assert_eq!(pool_order(&short, &long), Ordering::Less);
        assert_eq!(pool_order(&lex_a, &lex_b), Ordering::Less);
        assert_eq!(pool_order(&lex_a, &lex_a), Ordering::Equal);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let a = street(1, "Adler", 10);
        let b = street(2, "Bären", 10);
        let deduped = dedup_by_id(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, 1);
        assert_eq!(deduped[1].id, 2);
    }

    #[test]
    fn test_street_json_shape() {
        let p = street(1, "Elisabeth-Feller-Weg", 10);
        let json = serde_json::to_value(p.as_ref()).unwrap();
        assert_eq!(json["class"], "street");
        assert_eq!(json["name"], "Elisabeth-Feller-Weg");
        assert_eq!(json["length"], 10);
        assert_eq!(json["postcode"], "12524");
        assert_eq!(json["relevance"], 0);
        assert!(json.get("street").is_none());
        assert!(json.get("houseNumber").is_none());
        assert!(json.get("type").is_none());
    }

    #[test]
    fn test_location_json_shape() {
        let p = Place {
            id: 7,
            name: "Strandlust".to_string(),
            simple_name: simplify("Strandlust"),
            district: district(),
            lat: 52.37,
            lon: 13.65,
            relevance: AtomicU64::new(3),
            kind: PlaceKind::Location {
                location_type: "restaurant".to_string(),
                street_id: 1,
                street_name: "Elisabeth-Feller-Weg".to_string(),
                house_number: "3a".to_string(),
            },
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["class"], "location");
        assert_eq!(json["type"], "restaurant");
        assert_eq!(json["street"], "Elisabeth-Feller-Weg");
        assert_eq!(json["streetID"], 1);
        assert_eq!(json["houseNumber"], "3a");
        assert_eq!(json["relevance"], 3);
        assert!(json.get("length").is_none());
    }

    #[test]
    fn test_house_number_json_shape() {
        let p = Place {
            id: 9,
            name: String::new(),
            simple_name: String::new(),
            district: district(),
            lat: 52.41,
            lon: 13.57,
            relevance: AtomicU64::new(0),
            kind: PlaceKind::HouseNumber {
                street_id: 1,
                street_name: "Elisabeth-Feller-Weg".to_string(),
                house_number: "1".to_string(),
            },
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["class"], "houseNumber");
        assert_eq!(json["houseNumber"], "1");
        assert_eq!(json["streetID"], 1);
        assert!(json.get("name").is_none());
        assert!(json.get("type").is_none());
        assert!(json.get("length").is_none());
    }
}
