//! Trail service trait covering search, batched path loading and ratings.

use async_trait::async_trait;

use crate::{TechRating, TrailBasicInfo, TrailLoadFilter, TrailPath, TrailSearchCriteria};

use super::error::TrailServiceError;

/// Asynchronous access to trail records.
///
/// Implementations may suspend on network or disk access. They must be
/// shareable across tasks because the overlay controller holds them behind
/// an `Arc`.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use trailside_core::{
///     TechRating, TrailBasicInfo, TrailLoadFilter, TrailPath, TrailSearchCriteria,
///     TrailService, TrailServiceError,
/// };
///
/// struct EmptyService;
///
/// #[async_trait]
/// impl TrailService for EmptyService {
///     async fn find_trails(
///         &self,
///         _criteria: &TrailSearchCriteria,
///     ) -> Result<Vec<TrailBasicInfo>, TrailServiceError> {
///         Ok(Vec::new())
///     }
///
///     async fn get_trails_paths(
///         &self,
///         _filter: &TrailLoadFilter,
///     ) -> Result<Vec<TrailPath>, TrailServiceError> {
///         Ok(Vec::new())
///     }
///
///     async fn tech_ratings(&self) -> Result<Vec<TechRating>, TrailServiceError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait TrailService: Send + Sync {
    /// Search trails around a map location.
    async fn find_trails(
        &self,
        criteria: &TrailSearchCriteria,
    ) -> Result<Vec<TrailBasicInfo>, TrailServiceError>;

    /// Load the paths of every trail in `filter` in one request.
    ///
    /// An empty filter yields an empty list, not an error.
    async fn get_trails_paths(
        &self,
        filter: &TrailLoadFilter,
    ) -> Result<Vec<TrailPath>, TrailServiceError>;

    /// List the difficulty ratings known to the service.
    async fn tech_ratings(&self) -> Result<Vec<TechRating>, TrailServiceError>;
}
