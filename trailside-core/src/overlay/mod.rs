//! Trail overlay: one GeoJSON source plus one line layer coloured by trail
//! difficulty.
//!
//! [`TrailLayerController`] owns the overlay's lifecycle. Its operations are
//! serialized: a call holds the controller for its whole
//! fetch-convert-apply sequence, so concurrent calls land on the map in the
//! order they were made.

mod error;
mod palette;
mod snapshot;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use geojson::FeatureCollection;
use tokio::sync::Mutex;

use crate::feature::TrailFeatureBuilder;
use crate::map::{GeometryFilter, LineLayer, MapHandle, MapSurface, MapSurfaceError};
use crate::{TrailBasicInfo, TrailService};

pub use error::OverlayError;
pub use palette::{DIFFICULTY_COLORS, UNKNOWN_DIFFICULTY_COLOR, difficulty_palette};
pub use snapshot::{CACHE_FILES_DIR, TRAIL_PATHS_CACHE_FILE, snapshot_path};

/// Id of the overlay's GeoJSON source.
pub const TRAIL_PATH_SOURCE_ID: &str = "trails";
/// Id of the overlay's line layer.
pub const TRAIL_PATH_LAYER_ID: &str = "trail-paths";
/// Width of trail lines in pixels.
pub const TRAIL_PATH_LINE_WIDTH: f64 = 2.0;

/// Lifecycle of the overlay on its map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    /// Source and layer are not on the map.
    #[default]
    Absent,
    /// Source and layer are registered; the source is empty.
    Initialized,
    /// The source holds trail features.
    Populated,
}

/// Adds, fills and removes the trail overlay.
pub struct TrailLayerController<S> {
    map: MapHandle<S>,
    service: Arc<dyn TrailService>,
    sdk_library_dir: Option<Utf8PathBuf>,
    state: Mutex<OverlayState>,
}

impl<S: MapSurface + 'static> TrailLayerController<S> {
    /// Control the overlay on the map behind `map`, fetching from `service`.
    pub fn new(map: MapHandle<S>, service: Arc<dyn TrailService>) -> Self {
        Self {
            map,
            service,
            sdk_library_dir: None,
            state: Mutex::new(OverlayState::Absent),
        }
    }

    /// Directory where the SDK keeps its files; enables
    /// [`Self::show_all_trails_from_sdk_cache`].
    #[must_use]
    pub fn with_sdk_library_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.sdk_library_dir = Some(dir.into());
        self
    }

    /// Configured SDK library directory.
    pub fn sdk_library_dir(&self) -> Option<&Utf8Path> {
        self.sdk_library_dir.as_deref()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> OverlayState {
        *self.state.lock().await
    }

    /// Register an empty source and the difficulty-coloured line layer.
    ///
    /// # Errors
    /// Fails when the tech ratings cannot be fetched, when fewer than five
    /// exist, or when the source or layer id is already taken.
    pub async fn add_to_map(&self) -> Result<(), OverlayError> {
        let mut state = self.state.lock().await;
        let ratings = self.service.tech_ratings().await?;
        let layer = LineLayer {
            id: TRAIL_PATH_LAYER_ID.to_owned(),
            source: TRAIL_PATH_SOURCE_ID.to_owned(),
            filter: GeometryFilter::LineString,
            line_color: difficulty_palette(ratings)?,
            line_width: TRAIL_PATH_LINE_WIDTH,
        };
        self.map
            .run(move |surface| register(surface, layer))
            .await??;
        *state = OverlayState::Initialized;
        log::debug!("trail overlay added");
        Ok(())
    }

    /// Fetch the paths of `trails` and replace the overlay contents with
    /// them. Returns the number of features shown.
    ///
    /// # Errors
    /// Fetch, parse and map failures propagate; the overlay keeps whatever it
    /// showed before.
    pub async fn show_trails_from_features(
        &self,
        trails: &[TrailBasicInfo],
    ) -> Result<usize, OverlayError> {
        let mut state = self.state.lock().await;
        let features = TrailFeatureBuilder::new(self.service.as_ref())
            .build(trails)
            .await?;
        let shown = features.features.len();
        self.replace_source(features).await?;
        *state = OverlayState::Populated;
        log::info!("trail overlay shows {shown} features");
        Ok(shown)
    }

    /// Replace the overlay contents with the SDK's cached snapshot of every
    /// trail path.
    ///
    /// Returns `Ok(false)` without touching the map when no library directory
    /// is configured or the snapshot has not been written.
    ///
    /// # Errors
    /// A snapshot that exists but cannot be read or decoded is an error, as
    /// is a map failure.
    pub async fn show_all_trails_from_sdk_cache(&self) -> Result<bool, OverlayError> {
        let mut state = self.state.lock().await;
        let Some(library_dir) = self.sdk_library_dir.as_deref() else {
            log::warn!("no SDK library directory configured; trail cache unavailable");
            return Ok(false);
        };
        let path = snapshot_path(library_dir);
        let Some(features) = snapshot::load(&path)? else {
            log::warn!("trail cache snapshot {path} not found");
            return Ok(false);
        };
        let shown = features.features.len();
        self.replace_source(features).await?;
        *state = OverlayState::Populated;
        log::info!("trail overlay shows {shown} cached features from {path}");
        Ok(true)
    }

    /// Remove the layer, then the source.
    ///
    /// # Errors
    /// Fails when either is absent, for example if the overlay was never
    /// added.
    pub async fn remove_from_map(&self) -> Result<(), OverlayError> {
        let mut state = self.state.lock().await;
        self.map.run(unregister::<S>).await??;
        *state = OverlayState::Absent;
        log::debug!("trail overlay removed");
        Ok(())
    }

    async fn replace_source(&self, features: FeatureCollection) -> Result<(), OverlayError> {
        self.map
            .run(move |surface| surface.update_source(TRAIL_PATH_SOURCE_ID, features))
            .await??;
        Ok(())
    }
}

fn register<S: MapSurface>(surface: &mut S, layer: LineLayer) -> Result<(), MapSurfaceError> {
    surface.add_source(TRAIL_PATH_SOURCE_ID, empty_collection())?;
    if let Err(err) = surface.add_layer(layer) {
        surface.remove_source(TRAIL_PATH_SOURCE_ID)?;
        return Err(err);
    }
    Ok(())
}

fn unregister<S: MapSurface>(surface: &mut S) -> Result<(), MapSurfaceError> {
    surface.remove_layer(TRAIL_PATH_LAYER_ID)?;
    surface.remove_source(TRAIL_PATH_SOURCE_ID)
}

fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}
