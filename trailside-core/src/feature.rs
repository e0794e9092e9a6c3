//! Convert trail path records into display-ready GeoJSON features.
//!
//! [`convert`] is pure: it decodes each path payload, keeps whatever
//! properties the payload already carries and adds the display attributes the
//! overlay styles on. [`TrailFeatureBuilder`] wraps the single batched path
//! fetch around it.

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, GeoJson};
use thiserror::Error;

use crate::{TrailBasicInfo, TrailId, TrailLoadFilter, TrailPath, TrailService, TrailServiceError};

/// Property holding the numeric trail id. Always present.
pub const TRAIL_ID_PROPERTY: &str = "trailId";
/// Property holding the trail name, when basic info is known.
pub const NAME_PROPERTY: &str = "name";
/// Property holding the difficulty code, when basic info is known.
pub const DIFFICULTY_PROPERTY: &str = "difficulty-level";

/// A path payload could not be turned into a feature.
#[derive(Debug, Error)]
pub enum FeatureParseError {
    /// The payload is not valid GeoJSON.
    #[error("path {path_id} of trail {trail_id} is not valid GeoJSON: {source}")]
    InvalidGeoJson {
        /// Offending path record.
        path_id: u64,
        /// Trail the path belongs to.
        trail_id: TrailId,
        /// Decoder error.
        #[source]
        source: Box<geojson::Error>,
    },
    /// The payload is GeoJSON but neither a Feature nor a Geometry.
    #[error("path {path_id} of trail {trail_id} holds a FeatureCollection, expected a Feature")]
    UnexpectedCollection {
        /// Offending path record.
        path_id: u64,
        /// Trail the path belongs to.
        trail_id: TrailId,
    },
}

/// Build one feature per path, preserving input order.
///
/// Paths are matched to `trails` by trail id; when several trails share an id
/// the first wins. Paths with no matching trail still yield a feature carrying
/// only [`TRAIL_ID_PROPERTY`] on top of the payload's own properties.
///
/// # Errors
/// Fails on the first malformed payload; no partial collection is returned.
///
/// # Examples
/// ```
/// use trailside_core::feature::{DIFFICULTY_PROPERTY, TRAIL_ID_PROPERTY, convert};
/// use trailside_core::{TechRating, TrailBasicInfo, TrailPath};
///
/// let path = TrailPath {
///     id: 1,
///     trail_id: 42,
///     geojson: r#"{"type":"LineString","coordinates":[[0.0,0.0],[1.0,1.0]]}"#.into(),
/// };
/// let trail = TrailBasicInfo {
///     id: 42,
///     name: "Ridge".into(),
///     tech_rating_low: TechRating::new("1", "Easy", 1),
///     tech_rating_high: TechRating::new("4", "Severe", 4),
/// };
///
/// let collection = convert(&[path], &[trail]).expect("valid payload");
/// let feature = &collection.features[0];
/// assert_eq!(feature.property(TRAIL_ID_PROPERTY), Some(&42.into()));
/// assert_eq!(feature.property(DIFFICULTY_PROPERTY), Some(&"4".into()));
/// ```
pub fn convert(
    paths: &[TrailPath],
    trails: &[TrailBasicInfo],
) -> Result<FeatureCollection, FeatureParseError> {
    let mut by_id: HashMap<TrailId, &TrailBasicInfo> = HashMap::with_capacity(trails.len());
    for trail in trails {
        by_id.entry(trail.id).or_insert(trail);
    }

    let features = paths
        .iter()
        .map(|path| trail_feature(path, by_id.get(&path.trail_id).copied()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn trail_feature(
    path: &TrailPath,
    trail: Option<&TrailBasicInfo>,
) -> Result<Feature, FeatureParseError> {
    let mut feature = decode_payload(path)?;
    feature.set_property(TRAIL_ID_PROPERTY, path.trail_id);
    if let Some(trail) = trail {
        feature.set_property(NAME_PROPERTY, trail.name.clone());
        feature.set_property(DIFFICULTY_PROPERTY, trail.difficulty_code());
    }
    Ok(feature)
}

fn decode_payload(path: &TrailPath) -> Result<Feature, FeatureParseError> {
    let decoded = path
        .geojson
        .parse::<GeoJson>()
        .map_err(|source| FeatureParseError::InvalidGeoJson {
            path_id: path.id,
            trail_id: path.trail_id,
            source: Box::new(source),
        })?;
    match decoded {
        GeoJson::Feature(feature) => Ok(feature),
        GeoJson::Geometry(geometry) => Ok(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }),
        GeoJson::FeatureCollection(_) => Err(FeatureParseError::UnexpectedCollection {
            path_id: path.id,
            trail_id: path.trail_id,
        }),
    }
}

/// Errors from [`TrailFeatureBuilder::build`].
#[derive(Debug, Error)]
pub enum BuildFeaturesError {
    /// The path fetch failed.
    #[error(transparent)]
    Service(#[from] TrailServiceError),
    /// A fetched payload was malformed.
    #[error(transparent)]
    Parse(#[from] FeatureParseError),
}

/// Fetches trail paths and converts them into a feature collection.
#[derive(Debug, Clone, Copy)]
pub struct TrailFeatureBuilder<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: TrailService + ?Sized> TrailFeatureBuilder<'a, S> {
    /// Borrow `service` for path fetches.
    pub const fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Fetch the paths of `trails` in one request and convert them.
    ///
    /// The returned geometry is the best the service has cached; no per-trail
    /// high-resolution download is attempted.
    ///
    /// # Errors
    /// Propagates service failures and payload parse failures.
    pub async fn build(
        &self,
        trails: &[TrailBasicInfo],
    ) -> Result<FeatureCollection, BuildFeaturesError> {
        let filter = TrailLoadFilter::for_trails(trails);
        let paths = self.service.get_trails_paths(&filter).await?;
        log::debug!(
            "fetched {} paths for {} trails",
            paths.len(),
            filter.trail_ids.len()
        );
        Ok(convert(&paths, trails)?)
    }
}
