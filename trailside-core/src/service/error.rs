//! Errors reported by trail service calls.

use thiserror::Error;

/// Errors from [`crate::service::TrailService`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrailServiceError {
    /// The service was used before the SDK finished initializing.
    #[error("trail service is not initialized")]
    NotInitialized,
    /// Backing trail data could not be read.
    #[error("failed to read trail data from {path}: {message}")]
    Io {
        /// Location that failed to load.
        path: String,
        /// Underlying error description.
        message: String,
    },
    /// Backing trail data was malformed.
    #[error("failed to parse trail data: {message}")]
    ParseError {
        /// Description of the parse failure.
        message: String,
    },
    /// The service reported a failure.
    #[error("trail service failed with {code}: {message}")]
    ServiceError {
        /// Service-specific status code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}
