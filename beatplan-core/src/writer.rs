use thiserror::Error;
use tracing::{debug, error, info};

use crate::backend::Backend;
use crate::connectivity::Connectivity;
use crate::operation::Operation;
use crate::queue::WriteQueue;

/// Where a submitted batch ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReport {
    /// Every write reached the backend.
    Written { count: usize },
    /// The device was offline; every write is waiting in the queue.
    Queued { count: usize },
}

#[derive(Debug, Error)]
pub enum SubmitError<B, Q> {
    /// Writes before the failing one were applied and stay applied.
    #[error("backend write {applied} of {total} failed: {source}")]
    Backend {
        applied: usize,
        total: usize,
        #[source]
        source: B,
    },

    #[error("offline queue rejected write after {queued} queued: {source}")]
    Queue {
        queued: usize,
        #[source]
        source: Q,
    },
}

/// Persists materialized writes: straight to the backend when online,
/// into the offline queue otherwise.
///
/// A batch is not transactional. There is no retry, no rollback, and no
/// guard against two submissions of the same beat.
pub struct PlanWriter<B, Q, C> {
    backend: B,
    queue: Q,
    connectivity: C,
}

impl<B, Q, C> PlanWriter<B, Q, C>
where
    B: Backend,
    Q: WriteQueue,
    C: Connectivity,
{
    pub fn new(backend: B, queue: Q, connectivity: C) -> Self {
        Self {
            backend,
            queue,
            connectivity,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    pub async fn submit(
        &self,
        ops: &[Operation],
    ) -> Result<SubmitReport, SubmitError<B::Error, Q::Error>> {
        if !self.connectivity.is_online() {
            return self.enqueue_all(ops);
        }

        for (applied, op) in ops.iter().enumerate() {
            debug!(kind = op.kind(), "applying write");
            if let Err(source) = self.backend.apply(op).await {
                error!(
                    kind = op.kind(),
                    applied,
                    total = ops.len(),
                    error = %source,
                    "backend write failed"
                );
                return Err(SubmitError::Backend {
                    applied,
                    total: ops.len(),
                    source,
                });
            }
        }

        info!(count = ops.len(), "writes applied to backend");
        Ok(SubmitReport::Written { count: ops.len() })
    }

    fn enqueue_all(
        &self,
        ops: &[Operation],
    ) -> Result<SubmitReport, SubmitError<B::Error, Q::Error>> {
        for (queued, op) in ops.iter().enumerate() {
            let seq = self
                .queue
                .enqueue(op)
                .map_err(|source| SubmitError::<B::Error, Q::Error>::Queue { queued, source })?;
            debug!(kind = op.kind(), seq, "queued write while offline");
        }

        info!(count = ops.len(), "offline, writes queued for replay");
        Ok(SubmitReport::Queued { count: ops.len() })
    }
}
