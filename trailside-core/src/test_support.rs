//! Test doubles and fixtures shared by unit and behaviour tests.
//!
//! Nothing here talks to a real trail service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::sdk::{ProgressReporter, SdkBackend, SdkInitError, SdkInitRequest};
use crate::{
    TechRating, TrailBasicInfo, TrailId, TrailLoadFilter, TrailPath, TrailSearchCriteria,
    TrailService, TrailServiceError,
};

/// In-memory `TrailService` returning pre-configured records.
///
/// Every path request is recorded so tests can assert that paths are fetched
/// in a single batch.
#[derive(Debug, Default)]
pub struct StubTrailService {
    trails: Vec<TrailBasicInfo>,
    paths: Vec<TrailPath>,
    ratings: Vec<TechRating>,
    error: Option<TrailServiceError>,
    path_error: Option<TrailServiceError>,
    path_calls: AtomicUsize,
    requested: Mutex<Vec<Vec<TrailId>>>,
}

impl StubTrailService {
    /// Create a service that knows the five sample tech ratings and nothing
    /// else.
    pub fn new() -> Self {
        Self::default().with_ratings(sample_tech_ratings())
    }

    /// Trails returned by `find_trails`.
    #[must_use]
    pub fn with_trails(mut self, trails: Vec<TrailBasicInfo>) -> Self {
        self.trails = trails;
        self
    }

    /// Paths served by `get_trails_paths`, filtered by the requested ids.
    #[must_use]
    pub fn with_paths(mut self, paths: Vec<TrailPath>) -> Self {
        self.paths = paths;
        self
    }

    /// Ratings returned by `tech_ratings`.
    #[must_use]
    pub fn with_ratings(mut self, ratings: Vec<TechRating>) -> Self {
        self.ratings = ratings;
        self
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(mut self, error: TrailServiceError) -> Self {
        self.error = Some(error);
        self
    }

    /// Fail only path requests with `error`.
    #[must_use]
    pub fn with_path_error(mut self, error: TrailServiceError) -> Self {
        self.path_error = Some(error);
        self
    }

    /// Number of `get_trails_paths` calls so far.
    pub fn path_calls(&self) -> usize {
        self.path_calls.load(Ordering::SeqCst)
    }

    /// Trail ids of every path request, in call order.
    pub fn requested_ids(&self) -> Vec<Vec<TrailId>> {
        self.requested.lock().clone()
    }

    fn check(&self) -> Result<(), TrailServiceError> {
        self.error.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl TrailService for StubTrailService {
    async fn find_trails(
        &self,
        criteria: &TrailSearchCriteria,
    ) -> Result<Vec<TrailBasicInfo>, TrailServiceError> {
        self.check()?;
        let limit = usize::try_from(criteria.limit.get()).unwrap_or(usize::MAX);
        Ok(self.trails.iter().take(limit).cloned().collect())
    }

    async fn get_trails_paths(
        &self,
        filter: &TrailLoadFilter,
    ) -> Result<Vec<TrailPath>, TrailServiceError> {
        self.path_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(filter.trail_ids.clone());
        self.check()?;
        if let Some(error) = &self.path_error {
            return Err(error.clone());
        }
        Ok(self
            .paths
            .iter()
            .filter(|path| filter.trail_ids.contains(&path.trail_id))
            .cloned()
            .collect())
    }

    async fn tech_ratings(&self) -> Result<Vec<TechRating>, TrailServiceError> {
        self.check()?;
        Ok(self.ratings.clone())
    }
}

/// Five ratings, deliberately listed out of level order.
pub fn sample_tech_ratings() -> Vec<TechRating> {
    vec![
        TechRating::new("3", "Difficult", 3),
        TechRating::new("1", "Easy", 1),
        TechRating::new("5", "Extreme", 5),
        TechRating::new("2", "Moderate", 2),
        TechRating::new("4", "Severe", 4),
    ]
}

/// Trail whose hardest section has difficulty `code`.
pub fn sample_trail(id: TrailId, name: &str, code: &str) -> TrailBasicInfo {
    TrailBasicInfo {
        id,
        name: name.to_owned(),
        tech_rating_low: TechRating::new("1", "Easy", 1),
        tech_rating_high: TechRating::new(code, format!("Rating {code}"), 0),
    }
}

/// Path for `trail_id` whose payload is a LineString Feature.
pub fn line_path(id: u64, trail_id: TrailId) -> TrailPath {
    TrailPath {
        id,
        trail_id,
        geojson: format!(
            r#"{{"type":"Feature","geometry":{{"type":"LineString","coordinates":[[-105.0,39.7],[-105.1,39.8]]}},"properties":{{"pathId":{id}}}}}"#
        ),
    }
}

#[derive(Debug, Clone)]
enum Ending {
    Complete,
    Fail(String),
    Stall,
}

/// SDK backend that reports a fixed progress sequence, then ends as
/// scripted.
#[derive(Debug, Clone)]
pub struct ScriptedSdkBackend {
    steps: Vec<u8>,
    ending: Ending,
    seen_user_ids: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSdkBackend {
    fn scripted(steps: Vec<u8>, ending: Ending) -> Self {
        Self {
            steps,
            ending,
            seen_user_ids: Arc::default(),
        }
    }

    /// Report `steps`, then succeed.
    pub fn completing(steps: Vec<u8>) -> Self {
        Self::scripted(steps, Ending::Complete)
    }

    /// Report `steps`, then fail with `message`.
    pub fn failing(steps: Vec<u8>, message: &str) -> Self {
        Self::scripted(steps, Ending::Fail(message.to_owned()))
    }

    /// Report `steps`, then never finish.
    pub fn stalling(steps: Vec<u8>) -> Self {
        Self::scripted(steps, Ending::Stall)
    }

    /// User ids observed by `initialize`, shared with clones.
    pub fn seen_user_ids(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.seen_user_ids)
    }
}

#[async_trait]
impl SdkBackend for ScriptedSdkBackend {
    async fn initialize(
        &self,
        request: SdkInitRequest,
        progress: ProgressReporter,
    ) -> Result<(), SdkInitError> {
        self.seen_user_ids.lock().push(request.identity.user_id());
        for step in &self.steps {
            progress.report(*step).await;
        }
        match &self.ending {
            Ending::Complete => Ok(()),
            Ending::Fail(message) => Err(SdkInitError::Backend {
                message: message.clone(),
            }),
            Ending::Stall => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}
