//! SDK backend that initializes by loading a catalogue file.

use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use trailside_core::sdk::{ProgressReporter, SdkBackend, SdkInitError, SdkInitRequest};

use super::{Catalogue, CatalogueTrailService};

/// Loads a catalogue into a [`CatalogueTrailService`] as SDK initialization.
#[derive(Debug, Clone)]
pub struct CatalogueSdk {
    path: Utf8PathBuf,
    service: Arc<CatalogueTrailService>,
}

impl CatalogueSdk {
    /// Initialize `service` from the catalogue at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>, service: Arc<CatalogueTrailService>) -> Self {
        Self {
            path: path.into(),
            service,
        }
    }

    /// Catalogue location.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl SdkBackend for CatalogueSdk {
    async fn initialize(
        &self,
        request: SdkInitRequest,
        progress: ProgressReporter,
    ) -> Result<(), SdkInitError> {
        log::debug!(
            "initializing catalogue SDK for user {} against {} (token present: {})",
            request.identity.user_id(),
            request.config.endpoints.ws_url,
            request.access.access_token().is_some()
        );
        progress.report(0).await;
        let catalogue = Catalogue::load(&self.path).map_err(|err| SdkInitError::Backend {
            message: err.to_string(),
        })?;
        progress.report(50).await;
        self.service.install(catalogue);
        progress.report(100).await;
        Ok(())
    }
}
