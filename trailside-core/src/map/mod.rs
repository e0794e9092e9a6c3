//! Map rendering surface abstraction.
//!
//! A [`MapSurface`] holds named GeoJSON sources and styled layers drawn from
//! them. Surfaces are owned by a single UI context: every mutation goes
//! through a [`MapHandle`], which forwards it to the [`MapContext`] driving
//! the surface.

mod dispatch;
mod memory;
mod style;

use geojson::FeatureCollection;
use thiserror::Error;

pub use dispatch::{DispatchError, MapContext, MapHandle};
pub use memory::{MemoryMapSurface, RenderedLine};
pub use style::{Color, ColorMatch, GeometryFilter, LineLayer};

/// Errors reported by a [`MapSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapSurfaceError {
    /// A source with this id is already registered.
    #[error("source `{0}` already exists")]
    DuplicateSource(String),
    /// A layer with this id is already registered.
    #[error("layer `{0}` already exists")]
    DuplicateLayer(String),
    /// No source with this id is registered.
    #[error("source `{0}` does not exist")]
    MissingSource(String),
    /// No layer with this id is registered.
    #[error("layer `{0}` does not exist")]
    MissingLayer(String),
    /// The source is still drawn by a layer.
    #[error("source `{source_id}` is still used by layer `{layer_id}`")]
    SourceInUse {
        /// Source that could not be removed.
        source_id: String,
        /// First layer referencing it.
        layer_id: String,
    },
}

/// Synchronous operations on a map style.
///
/// Implementations are not required to be thread-safe; they live inside a
/// [`MapContext`] and are only touched from there.
pub trait MapSurface {
    /// Register a new GeoJSON source.
    ///
    /// # Errors
    /// [`MapSurfaceError::DuplicateSource`] if `id` is taken.
    fn add_source(&mut self, id: &str, data: FeatureCollection) -> Result<(), MapSurfaceError>;

    /// Register a line layer drawing from an existing source.
    ///
    /// # Errors
    /// [`MapSurfaceError::DuplicateLayer`] if the layer id is taken and
    /// [`MapSurfaceError::MissingSource`] if its source is absent.
    fn add_layer(&mut self, layer: LineLayer) -> Result<(), MapSurfaceError>;

    /// Replace the full contents of a source.
    ///
    /// # Errors
    /// [`MapSurfaceError::MissingSource`] if `id` is absent.
    fn update_source(&mut self, id: &str, data: FeatureCollection)
    -> Result<(), MapSurfaceError>;

    /// Remove a layer.
    ///
    /// # Errors
    /// [`MapSurfaceError::MissingLayer`] if `id` is absent.
    fn remove_layer(&mut self, id: &str) -> Result<(), MapSurfaceError>;

    /// Remove a source no layer draws from.
    ///
    /// # Errors
    /// [`MapSurfaceError::MissingSource`] if `id` is absent and
    /// [`MapSurfaceError::SourceInUse`] if a layer still references it.
    fn remove_source(&mut self, id: &str) -> Result<(), MapSurfaceError>;
}
