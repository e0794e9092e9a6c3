//! Trail service answering from an in-memory catalogue.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use geo::Coord;
use parking_lot::RwLock;
use trailside_core::{
    TechRating, TrailBasicInfo, TrailLoadFilter, TrailPath, TrailSearchCriteria, TrailService,
    TrailServiceError,
};

use super::Catalogue;

const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// [`TrailService`] backed by a [`Catalogue`].
///
/// Every call fails with [`TrailServiceError::NotInitialized`] until a
/// catalogue is installed, mirroring an SDK that has not finished
/// initializing.
#[derive(Debug, Default)]
pub struct CatalogueTrailService {
    catalogue: RwLock<Option<Arc<Catalogue>>>,
}

impl CatalogueTrailService {
    /// Create a service with no catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service already serving `catalogue`.
    pub fn with_catalogue(catalogue: Catalogue) -> Self {
        let service = Self::new();
        service.install(catalogue);
        service
    }

    /// Start serving `catalogue`, replacing any previous one.
    pub fn install(&self, catalogue: Catalogue) {
        log::debug!(
            "catalogue installed: {} trails, {} paths",
            catalogue.trails().len(),
            catalogue.paths().len()
        );
        *self.catalogue.write() = Some(Arc::new(catalogue));
    }

    /// Whether a catalogue is installed.
    pub fn is_initialized(&self) -> bool {
        self.catalogue.read().is_some()
    }

    fn current(&self) -> Result<Arc<Catalogue>, TrailServiceError> {
        self.catalogue
            .read()
            .clone()
            .ok_or(TrailServiceError::NotInitialized)
    }
}

#[async_trait]
impl TrailService for CatalogueTrailService {
    async fn find_trails(
        &self,
        criteria: &TrailSearchCriteria,
    ) -> Result<Vec<TrailBasicInfo>, TrailServiceError> {
        let catalogue = self.current()?;
        let radius = criteria.radius.metres();
        let name = criteria.name.as_deref().map(str::to_lowercase);

        let mut matches: Vec<(f64, &TrailBasicInfo)> = catalogue
            .trails()
            .iter()
            .filter(|trail| {
                name.as_deref()
                    .is_none_or(|needle| trail.info.name.to_lowercase().contains(needle))
            })
            .map(|trail| (great_circle_metres(criteria.map_center, trail.location), &trail.info))
            .filter(|(distance, _)| *distance <= radius)
            .collect();
        matches.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let limit = usize::try_from(criteria.limit.get()).unwrap_or(usize::MAX);
        Ok(matches
            .into_iter()
            .take(limit)
            .map(|(_, info)| info.clone())
            .collect())
    }

    async fn get_trails_paths(
        &self,
        filter: &TrailLoadFilter,
    ) -> Result<Vec<TrailPath>, TrailServiceError> {
        let catalogue = self.current()?;
        Ok(catalogue
            .paths()
            .iter()
            .filter(|path| filter.trail_ids.contains(&path.trail_id))
            .cloned()
            .collect())
    }

    async fn tech_ratings(&self) -> Result<Vec<TechRating>, TrailServiceError> {
        Ok(self.current()?.tech_ratings().to_vec())
    }
}

/// Haversine distance between two WGS84 coordinates.
fn great_circle_metres(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let (lat1, lat2) = (from.y.to_radians(), to.y.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (to.x - from.x).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METRES * h.sqrt().min(1.0).asin()
}
