use crate::PlaceId;
use crate::corpus::Corpus;
use crate::normalize::simplify;
use crate::place::{District, Place, PlaceKind};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use thiserror::Error;

/// Initialization failures. Referential violations name the offending
/// record so a broken export can be fixed without a debugger.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{file}'")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse '{file}'")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("duplicate district postcode '{postcode}'")]
    DuplicateDistrict { postcode: String },
    #[error("duplicate place id {id} in '{file}'")]
    DuplicatePlaceId { file: String, id: PlaceId },
    #[error("{kind} {id} references unknown postcode '{postcode}'")]
    UnknownDistrict {
        kind: &'static str,
        id: PlaceId,
        postcode: String,
    },
    #[error("{kind} {id} references unknown street {street_id}")]
    UnknownStreet {
        kind: &'static str,
        id: PlaceId,
        street_id: PlaceId,
    },
}

#[derive(Debug, Deserialize)]
struct DistrictRecord {
    postcode: String,
    district: String,
}

#[derive(Debug, Deserialize)]
struct StreetRecord {
    id: PlaceId,
    name: String,
    // present in the export, unused here
    #[serde(default)]
    #[allow(dead_code)]
    cluster: String,
    postcode: String,
    lat: f64,
    lon: f64,
    length: i64,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    id: PlaceId,
    #[serde(rename = "type")]
    location_type: String,
    name: String,
    street_id: PlaceId,
    house_number: String,
    postcode: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct HouseNumberRecord {
    id: PlaceId,
    street_id: PlaceId,
    house_number: String,
    postcode: String,
    lat: f64,
    lon: f64,
}

fn read_records<R: io::Read, T: for<'de> Deserialize<'de>>(
    reader: R,
    file: &str,
) -> Result<Vec<T>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for record in rdr.deserialize::<T>() {
        records.push(record.map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })?);
    }
    Ok(records)
}

/// Builds the corpus graph from the four CSV collections.
///
/// Streets are loaded first so locations and house numbers can be checked
/// against them; any dangling reference aborts the load.
pub fn load(
    districts: impl io::Read,
    streets: impl io::Read,
    locations: impl io::Read,
    housenumbers: impl io::Read,
) -> Result<Corpus, LoadError> {
    let district_records: Vec<DistrictRecord> = read_records(districts, "districts")?;
    let street_records: Vec<StreetRecord> = read_records(streets, "streets")?;
    let location_records: Vec<LocationRecord> = read_records(locations, "locations")?;
    let house_number_records: Vec<HouseNumberRecord> = read_records(housenumbers, "housenumbers")?;

    let mut district_map: HashMap<String, Arc<District>> = HashMap::new();
    for record in district_records {
        if district_map.contains_key(&record.postcode) {
            return Err(LoadError::DuplicateDistrict {
                postcode: record.postcode,
            });
        }
        let district = Arc::new(District {
            postcode: record.postcode.clone(),
            name: record.district,
        });
        district_map.insert(record.postcode, district);
    }

    let mut corpus = Corpus {
        districts: district_map,
        ..Corpus::default()
    };

    let mut streets_by_id: HashMap<PlaceId, Arc<Place>> = HashMap::new();
    for record in street_records {
        let district =
            corpus
                .districts
                .get(&record.postcode)
                .cloned()
                .ok_or(LoadError::UnknownDistrict {
                    kind: "street",
                    id: record.id,
                    postcode: record.postcode.clone(),
                })?;
        let place = Arc::new(Place {
            id: record.id,
            simple_name: simplify(&record.name),
            name: record.name,
            district,
            lat: record.lat,
            lon: record.lon,
            relevance: AtomicU64::new(0),
            kind: PlaceKind::Street {
                length: record.length,
            },
        });
        if corpus.places.insert(place.id, place.clone()).is_some() {
            return Err(LoadError::DuplicatePlaceId {
                file: "streets".to_string(),
                id: place.id,
            });
        }
        streets_by_id.insert(place.id, place);
        corpus.street_count += 1;
    }

    for record in location_records {
        let street = streets_by_id
            .get(&record.street_id)
            .ok_or(LoadError::UnknownStreet {
                kind: "location",
                id: record.id,
                street_id: record.street_id,
            })?;
        let district =
            corpus
                .districts
                .get(&record.postcode)
                .cloned()
                .ok_or(LoadError::UnknownDistrict {
                    kind: "location",
                    id: record.id,
                    postcode: record.postcode.clone(),
                })?;
        let place = Arc::new(Place {
            id: record.id,
            simple_name: simplify(&record.name),
            name: record.name,
            district,
            lat: record.lat,
            lon: record.lon,
            relevance: AtomicU64::new(0),
            kind: PlaceKind::Location {
                location_type: record.location_type,
                street_id: street.id,
                street_name: street.name.clone(),
                house_number: record.house_number,
            },
        });
        if corpus.places.insert(place.id, place).is_some() {
            return Err(LoadError::DuplicatePlaceId {
                file: "locations".to_string(),
                id: record.id,
            });
        }
        corpus.location_count += 1;
    }

    for record in house_number_records {
        let street = streets_by_id
            .get(&record.street_id)
            .ok_or(LoadError::UnknownStreet {
                kind: "house number",
                id: record.id,
                street_id: record.street_id,
            })?;
        let district =
            corpus
                .districts
                .get(&record.postcode)
                .cloned()
                .ok_or(LoadError::UnknownDistrict {
                    kind: "house number",
                    id: record.id,
                    postcode: record.postcode.clone(),
                })?;
        let place = Arc::new(Place {
            id: record.id,
            name: String::new(),
            simple_name: String::new(),
            district,
            lat: record.lat,
            lon: record.lon,
            relevance: AtomicU64::new(0),
            kind: PlaceKind::HouseNumber {
                street_id: street.id,
                street_name: street.name.clone(),
                house_number: record.house_number,
            },
        });
        if corpus.places.insert(place.id, place.clone()).is_some() {
            return Err(LoadError::DuplicatePlaceId {
                file: "housenumbers".to_string(),
                id: record.id,
            });
        }
        corpus
            .house_numbers_by_street
            .entry(street.id)
            .or_default()
            .push(place);
        corpus.house_number_count += 1;
    }

    info!(
        "[LOAD] {} districts, {} streets, {} locations, {} house numbers",
        corpus.districts.len(),
        corpus.street_count,
        corpus.location_count,
        corpus.house_number_count
    );

    Ok(corpus)
}

/// Opens the four CSV files and delegates to [`load`].
pub fn load_files(
    districts: &Path,
    streets: &Path,
    locations: &Path,
    housenumbers: &Path,
) -> Result<Corpus, LoadError> {
    let open = |path: &Path| -> Result<File, LoadError> {
        File::open(path).map_err(|source| LoadError::Io {
            file: path.display().to_string(),
            source,
        })
    };
    load(
        open(districts)?,
        open(streets)?,
        open(locations)?,
        open(housenumbers)?,
    )
}
