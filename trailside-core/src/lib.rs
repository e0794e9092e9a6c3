//! Core of the Trailside trail overlay.
//!
//! The crate resolves host configuration, tracks the signed-in user, starts
//! the external trail SDK and turns the trails it returns into a styled line
//! overlay on a map surface. The SDK, its trail service and the map renderer
//! are external; they appear here as the [`sdk::SdkBackend`],
//! [`TrailService`] and [`map::MapSurface`] traits.
//!
//! A typical session resolves a [`config::Configuration`], runs
//! [`sdk::initialize_sdk`] to completion, searches with
//! [`TrailService::find_trails`] and hands the results to
//! [`overlay::TrailLayerController`].

pub mod config;
pub mod feature;
pub mod identity;
pub mod map;
pub mod overlay;
pub mod sdk;
pub mod service;
mod trail;

#[doc(hidden)]
pub mod test_support;

pub use service::{TrailService, TrailServiceError};
pub use trail::{
    CriteriaError, DistanceRadius, QueryLimit, TechRating, TrailBasicInfo, TrailId,
    TrailLoadFilter, TrailPath, TrailSearchCriteria,
};
