//! Facade crate for the Trailside trail overlay.
//!
//! This crate re-exports the core domain types and orchestration entry points,
//! and exposes the offline catalogue backend behind the `catalogue` feature.

#![forbid(unsafe_code)]

pub use trailside_core::config::{ConfigError, Configuration, HostMetadata};
pub use trailside_core::identity::{IdentityContext, IdentityProvider};
pub use trailside_core::map::{MapContext, MapHandle, MapSurface, MapSurfaceError};
pub use trailside_core::overlay::{OverlayError, OverlayState, TrailLayerController};
pub use trailside_core::sdk::{SdkBackend, SdkInitError, SdkInitTask, initialize_sdk};
pub use trailside_core::{
    CriteriaError, DistanceRadius, QueryLimit, TechRating, TrailBasicInfo, TrailId,
    TrailLoadFilter, TrailPath, TrailSearchCriteria, TrailService, TrailServiceError,
};

#[cfg(feature = "catalogue")]
pub use trailside_data::{
    Catalogue, CatalogueError, CatalogueSdk, CatalogueTrailService, MetadataFile,
};
