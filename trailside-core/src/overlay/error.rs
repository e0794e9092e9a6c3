//! Errors raised while managing the trail overlay.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::TrailServiceError;
use crate::feature::{BuildFeaturesError, FeatureParseError};
use crate::map::{DispatchError, MapSurfaceError};

/// Errors returned by [`super::TrailLayerController`].
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Fetching ratings or paths failed.
    #[error("trail service request failed: {0}")]
    Service(#[from] TrailServiceError),
    /// A fetched path payload was malformed.
    #[error(transparent)]
    Parse(#[from] FeatureParseError),
    /// The map surface rejected a mutation.
    #[error("map update failed: {0}")]
    Map(#[from] MapSurfaceError),
    /// The map context stopped running.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The service knows too few difficulty ratings to build the palette.
    #[error("expected at least {expected} tech ratings, service returned {found}")]
    InsufficientTechRatings {
        /// Ratings the palette needs.
        expected: usize,
        /// Ratings returned.
        found: usize,
    },
    /// The cache snapshot exists but could not be read.
    #[error("failed to read trail cache snapshot {path}: {source}")]
    ReadSnapshot {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The cache snapshot is not valid GeoJSON.
    #[error("trail cache snapshot {path} is not valid GeoJSON: {source}")]
    ParseSnapshot {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: Box<geojson::Error>,
    },
    /// The cache snapshot holds GeoJSON other than a FeatureCollection.
    #[error("trail cache snapshot {path} is not a FeatureCollection")]
    SnapshotNotCollection {
        /// Snapshot location.
        path: Utf8PathBuf,
    },
}

impl From<BuildFeaturesError> for OverlayError {
    fn from(err: BuildFeaturesError) -> Self {
        match err {
            BuildFeaturesError::Service(err) => Self::Service(err),
            BuildFeaturesError::Parse(err) => Self::Parse(err),
        }
    }
}
