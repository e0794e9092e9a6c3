//! Error types emitted by the Trailside CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use trailside_core::config::ConfigError;
use trailside_core::overlay::OverlayError;
use trailside_core::sdk::SdkInitError;
use trailside_core::{CriteriaError, TrailServiceError};
use trailside_data::MetadataError;

/// Errors emitted by the Trailside CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The search centre, radius or limit is invalid.
    #[error("invalid trail search: {0}")]
    Criteria(#[from] CriteriaError),
    /// The host metadata file could not be loaded.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The host metadata lacks a required key or holds a malformed URL.
    #[error("SDK configuration is incomplete: {0}")]
    Config(#[from] ConfigError),
    /// Building the async runtime failed.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// SDK initialization did not complete.
    #[error("SDK initialization failed: {0}")]
    SdkInit(#[from] SdkInitError),
    /// The trail search failed.
    #[error("trail search failed: {0}")]
    Service(#[from] TrailServiceError),
    /// Adding or filling the trail overlay failed.
    #[error("trail overlay failed: {0}")]
    Overlay(#[from] OverlayError),
    /// Serializing the overlay GeoJSON failed.
    #[error("failed to serialize the trail overlay: {0}")]
    SerializeOverlay(#[source] serde_json::Error),
    /// Writing the overlay GeoJSON to disk failed.
    #[error("failed to write trail overlay to {path}: {source}")]
    WriteOverlay {
        /// Output location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the summary failed.
    #[error("failed to write summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
