//! File-backed data sources for Trailside.
//!
//! Responsibilities:
//! - Load host metadata for configuration resolution.
//! - Serve trail queries from an offline catalogue.
//! - Provide an SDK backend that initializes by loading that catalogue.
//!
//! Boundaries:
//! - Domain types and orchestration live in `trailside-core`.
//! - All file access goes through `trailside-fs`.

pub mod catalogue;
mod metadata;

pub use catalogue::{
    Catalogue, CatalogueError, CatalogueSdk, CatalogueTrail, CatalogueTrailService,
};
pub use metadata::{MetadataError, MetadataFile};
