//! Seams to the external SDK: the backend that performs initialization and
//! the credentials it is given.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::Configuration;
use crate::identity::IdentityContext;

use super::SdkInitEvent;

/// Errors ending an initialization attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkInitError {
    /// The backend reported a failure.
    #[error("SDK initialization failed: {message}")]
    Backend {
        /// Backend description of the failure.
        message: String,
    },
    /// [`super::SdkInitTask::cancel`] was called first.
    #[error("SDK initialization was cancelled")]
    Cancelled,
    /// The initialization task panicked or its runtime shut down.
    #[error("SDK initialization task aborted")]
    Aborted,
}

/// Supplies the credentials the SDK authenticates with.
pub trait AccessProvider: Send + Sync {
    /// Current access token, if the user is signed in.
    fn access_token(&self) -> Option<String>;
}

/// Access provider returning a fixed token.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessProvider {
    token: Option<String>,
}

impl StaticAccessProvider {
    /// Provide `token` for every request.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Provide no token.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl AccessProvider for StaticAccessProvider {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Everything the backend needs to initialize.
#[derive(Clone)]
pub struct SdkInitRequest {
    /// Resolved configuration.
    pub config: Configuration,
    /// Credential source.
    pub access: Arc<dyn AccessProvider>,
    /// Current user.
    pub identity: IdentityContext,
}

/// Channel through which a backend reports progress.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    events: mpsc::Sender<SdkInitEvent>,
}

impl ProgressReporter {
    pub(super) const fn new(events: mpsc::Sender<SdkInitEvent>) -> Self {
        Self { events }
    }

    /// Report `percent` complete. Values above 100 are clamped.
    ///
    /// Waits while the event buffer is full. Progress reported after the
    /// observer has gone away is dropped.
    pub async fn report(&self, percent: u8) {
        if self
            .events
            .send(SdkInitEvent::Progress(percent.min(100)))
            .await
            .is_err()
        {
            log::debug!("dropping SDK progress {percent}%: no observer");
        }
    }
}

/// The external SDK's initialization routine.
#[async_trait]
pub trait SdkBackend: Send + Sync + 'static {
    /// Initialize, reporting progress through `progress`.
    ///
    /// # Errors
    /// [`SdkInitError::Backend`] describing why initialization failed.
    async fn initialize(
        &self,
        request: SdkInitRequest,
        progress: ProgressReporter,
    ) -> Result<(), SdkInitError>;
}
