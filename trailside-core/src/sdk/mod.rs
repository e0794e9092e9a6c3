//! Asynchronous SDK initialization with progress events and cancellation.
//!
//! [`initialize_sdk`] runs an [`SdkBackend`] on a Tokio task. The returned
//! [`SdkInitTask`] yields [`SdkInitEvent::Progress`] events followed by
//! exactly one terminal event, tracks the resulting [`SdkInitState`] and can
//! cancel the attempt.

mod backend;
mod state;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use backend::{
    AccessProvider, ProgressReporter, SdkBackend, SdkInitError, SdkInitRequest,
    StaticAccessProvider,
};
pub use state::{SdkInitEvent, SdkInitState};

const EVENT_BUFFER: usize = 16;

/// A running initialization attempt.
#[derive(Debug)]
pub struct SdkInitTask {
    events: mpsc::Receiver<SdkInitEvent>,
    state: SdkInitState,
    cancel: CancellationToken,
    handle: JoinHandle<Result<(), SdkInitError>>,
}

/// Start initializing `backend` on the current Tokio runtime.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use trailside_core::config::{Configuration, REQUIRED_KEYS};
/// use trailside_core::identity::IdentityContext;
/// use trailside_core::sdk::{SdkInitRequest, SdkInitState, StaticAccessProvider, initialize_sdk};
/// use trailside_core::test_support::ScriptedSdkBackend;
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let metadata: HashMap<String, String> = REQUIRED_KEYS
///     .iter()
///     .map(|key| (key.to_string(), "https://example.com/".to_string()))
///     .collect();
/// let request = SdkInitRequest {
///     config: Configuration::resolve(&metadata).expect("complete metadata"),
///     access: Arc::new(StaticAccessProvider::anonymous()),
///     identity: IdentityContext::new(),
/// };
/// let mut task = initialize_sdk(ScriptedSdkBackend::completing(vec![50, 100]), request);
/// while task.next_event().await.is_some() {}
/// assert_eq!(task.state(), &SdkInitState::Completed);
/// # });
/// ```
pub fn initialize_sdk<B: SdkBackend>(backend: B, request: SdkInitRequest) -> SdkInitTask {
    let (sender, events) = mpsc::channel(EVENT_BUFFER);
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let handle = tokio::spawn(async move {
        let reporter = ProgressReporter::new(sender.clone());
        let outcome = tokio::select! {
            () = token.cancelled() => Err(SdkInitError::Cancelled),
            result = backend.initialize(request, reporter) => result,
        };
        let terminal = match &outcome {
            Ok(()) => SdkInitEvent::Completed,
            Err(err) => SdkInitEvent::Failed(Some(err.to_string())),
        };
        if sender.send(terminal).await.is_err() {
            log::debug!("SDK initialization finished with no observer");
        }
        outcome
    });
    log::debug!("SDK initialization started");
    SdkInitTask {
        events,
        state: SdkInitState::NotStarted,
        cancel,
        handle,
    }
}

impl SdkInitTask {
    /// Next event, or `None` once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<SdkInitEvent> {
        let event = self.events.recv().await?;
        self.state = self.state.apply(&event);
        Some(event)
    }

    /// State after every event received so far.
    pub const fn state(&self) -> &SdkInitState {
        &self.state
    }

    /// Ask the attempt to stop. It ends with [`SdkInitError::Cancelled`]
    /// unless it has already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drain remaining events and return the outcome.
    ///
    /// # Errors
    /// The backend's error, [`SdkInitError::Cancelled`] after
    /// [`Self::cancel`], or [`SdkInitError::Aborted`] if the task died.
    pub async fn wait(mut self) -> Result<(), SdkInitError> {
        while self.next_event().await.is_some() {}
        self.handle.await.map_err(|err| {
            log::debug!("SDK initialization task ended abnormally: {err}");
            SdkInitError::Aborted
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::config::{Configuration, REQUIRED_KEYS};
    use crate::identity::IdentityContext;
    use crate::test_support::ScriptedSdkBackend;

    fn request() -> SdkInitRequest {
        let metadata: HashMap<String, String> = REQUIRED_KEYS
            .iter()
            .map(|key| ((*key).to_owned(), "https://example.com/".to_owned()))
            .collect();
        SdkInitRequest {
            config: Configuration::resolve(&metadata).expect("complete metadata"),
            access: Arc::new(StaticAccessProvider::new("token")),
            identity: IdentityContext::with_user_id("driver"),
        }
    }

    #[tokio::test]
    async fn events_end_with_completion() {
        let mut task = initialize_sdk(ScriptedSdkBackend::completing(vec![10, 60, 100]), request());

        let mut events = Vec::new();
        while let Some(event) = task.next_event().await {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                SdkInitEvent::Progress(10),
                SdkInitEvent::Progress(60),
                SdkInitEvent::Progress(100),
                SdkInitEvent::Completed,
            ]
        );
        assert_eq!(task.state(), &SdkInitState::Completed);
        assert_eq!(task.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let task = initialize_sdk(ScriptedSdkBackend::failing(vec![20], "no network"), request());

        let err = task.wait().await.expect_err("backend fails");

        assert_eq!(
            err,
            SdkInitError::Backend {
                message: "no network".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn cancellation_stops_a_stalled_backend() {
        let mut task = initialize_sdk(ScriptedSdkBackend::stalling(vec![5]), request());

        assert_eq!(task.next_event().await, Some(SdkInitEvent::Progress(5)));
        task.cancel();
        let terminal = task.next_event().await;

        assert!(matches!(terminal, Some(SdkInitEvent::Failed(Some(_)))));
        assert!(matches!(task.state(), SdkInitState::Failed { .. }));
        assert_eq!(task.wait().await, Err(SdkInitError::Cancelled));
    }

    #[tokio::test]
    async fn backend_sees_request_identity() {
        let backend = ScriptedSdkBackend::completing(vec![]);
        let seen = backend.seen_user_ids();

        initialize_sdk(backend, request())
            .wait()
            .await
            .expect("initializes");

        assert_eq!(seen.lock().clone(), vec!["driver".to_owned()]);
    }
}
