//! Backend dispatch and the per-command writing session.

use std::path::Path;

use beatplan_core::{Backend, ManualConnectivity, Operation, PlanWriter};
use beatplan_fjall::FjallQueue;
use beatplan_remote::{RemoteError, RestBackend};
use thiserror::Error;
use tracing::info;

use crate::config::BackendSettings;

#[derive(Debug, Error)]
pub enum AnyBackendError {
    #[error("backend not configured")]
    Unconfigured,
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

/// Runtime-dispatched backend.
///
/// Without connection settings the tool can still queue writes; anything
/// that reaches the backend then fails with `Unconfigured`.
pub enum AnyBackend {
    Rest(RestBackend),
    Unconfigured,
}

impl AnyBackend {
    pub fn from_settings(settings: Option<BackendSettings>) -> Self {
        match settings {
            Some(s) => AnyBackend::Rest(RestBackend::new(s.url, s.api_key)),
            None => AnyBackend::Unconfigured,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, AnyBackend::Rest(_))
    }

    async fn probe(&self) -> bool {
        match self {
            AnyBackend::Rest(b) => b.probe().await,
            AnyBackend::Unconfigured => false,
        }
    }
}

impl Backend for AnyBackend {
    type Error = AnyBackendError;

    async fn apply(&self, op: &Operation) -> Result<(), Self::Error> {
        match self {
            AnyBackend::Rest(b) => b.apply(op).await.map_err(Into::into),
            AnyBackend::Unconfigured => Err(AnyBackendError::Unconfigured),
        }
    }
}

pub type Writer = PlanWriter<AnyBackend, FjallQueue, ManualConnectivity>;

/// Opens the queue and decides connectivity once for the command.
pub async fn open_writer(
    backend: AnyBackend,
    queue_path: &Path,
    force_offline: bool,
) -> Result<Writer, beatplan_fjall::FjallQueueError> {
    let queue = FjallQueue::open(queue_path)?;

    let online = !force_offline && backend.probe().await;
    info!(online, configured = backend.is_configured(), "connectivity decided");

    Ok(PlanWriter::new(backend, queue, ManualConnectivity::new(online)))
}
