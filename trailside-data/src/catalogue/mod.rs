//! Offline trail catalogue standing in for the external SDK's trail store.
//!
//! A catalogue is a JSON document of tech ratings, trails with a map location
//! and trail paths. [`CatalogueSdk`] loads it during SDK initialization and
//! hands it to a [`CatalogueTrailService`], which answers trail queries from
//! memory.

mod backend;
mod service;
mod wire;

use std::collections::{HashMap, HashSet};
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use thiserror::Error;
use trailside_core::{TechRating, TrailBasicInfo, TrailId, TrailPath};

pub use backend::CatalogueSdk;
pub use service::CatalogueTrailService;

use wire::{CatalogueDocument, WireTrail};

/// Errors raised while loading a catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The file could not be read.
    #[error("failed to read catalogue {path}: {source}")]
    Read {
        /// File location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The document does not match the catalogue format.
    #[error("catalogue is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A trail references a rating code the catalogue does not define.
    #[error("trail {trail_id} references unknown tech rating `{code}`")]
    UnknownTechRating {
        /// Offending trail.
        trail_id: TrailId,
        /// Undefined code.
        code: String,
    },
    /// Two trails share an id.
    #[error("trail id {0} appears more than once")]
    DuplicateTrail(TrailId),
    /// A trail location is not a valid longitude/latitude pair.
    #[error("trail {0} has an invalid location")]
    InvalidLocation(TrailId),
}

/// A trail with the map position searches measure distance from.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueTrail {
    /// Search-facing record.
    pub info: TrailBasicInfo,
    /// Trailhead, `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
}

/// Validated catalogue contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    tech_ratings: Vec<TechRating>,
    trails: Vec<CatalogueTrail>,
    paths: Vec<TrailPath>,
}

impl Catalogue {
    /// Read and validate the catalogue at `path`.
    ///
    /// # Errors
    /// [`CatalogueError::Read`] if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, CatalogueError> {
        let raw = trailside_fs::read_to_string(path).map_err(|source| CatalogueError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate catalogue JSON.
    ///
    /// Paths are kept verbatim; their GeoJSON is only decoded when trails are
    /// shown.
    ///
    /// # Errors
    /// Returns [`CatalogueError`] for malformed documents, unknown rating
    /// codes, duplicate trail ids and invalid locations.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogueError> {
        let document: CatalogueDocument = serde_json::from_str(raw)?;
        let tech_ratings: Vec<TechRating> = document
            .tech_ratings
            .into_iter()
            .map(|rating| TechRating::new(rating.code, rating.name, rating.level))
            .collect();
        let by_code: HashMap<&str, &TechRating> = tech_ratings
            .iter()
            .map(|rating| (rating.code.as_str(), rating))
            .collect();

        let mut seen = HashSet::new();
        let trails = document
            .trails
            .into_iter()
            .map(|trail| {
                if !seen.insert(trail.id) {
                    return Err(CatalogueError::DuplicateTrail(trail.id));
                }
                resolve_trail(trail, &by_code)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let paths = document
            .paths
            .into_iter()
            .map(|path| TrailPath {
                id: path.id,
                trail_id: path.trail_id,
                geojson: path.payload(),
            })
            .collect();

        Ok(Self {
            tech_ratings,
            trails,
            paths,
        })
    }

    /// Ratings in document order.
    pub fn tech_ratings(&self) -> &[TechRating] {
        &self.tech_ratings
    }

    /// Trails in document order.
    pub fn trails(&self) -> &[CatalogueTrail] {
        &self.trails
    }

    /// Paths in document order.
    pub fn paths(&self) -> &[TrailPath] {
        &self.paths
    }
}

fn resolve_trail(
    trail: WireTrail,
    by_code: &HashMap<&str, &TechRating>,
) -> Result<CatalogueTrail, CatalogueError> {
    let rating = |code: String| {
        by_code
            .get(code.as_str())
            .map(|rating| (*rating).clone())
            .ok_or(CatalogueError::UnknownTechRating {
                trail_id: trail.id,
                code,
            })
    };
    let tech_rating_low = rating(trail.tech_rating_low)?;
    let tech_rating_high = rating(trail.tech_rating_high)?;
    let location = Coord {
        x: trail.location.lon,
        y: trail.location.lat,
    };
    let valid = (-180.0..=180.0).contains(&location.x) && (-90.0..=90.0).contains(&location.y);
    if !valid {
        return Err(CatalogueError::InvalidLocation(trail.id));
    }
    Ok(CatalogueTrail {
        info: TrailBasicInfo {
            id: trail.id,
            name: trail.name,
            tech_rating_low,
            tech_rating_high,
        },
        location,
    })
}
