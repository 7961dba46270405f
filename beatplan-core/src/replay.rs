use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::connectivity::Connectivity;
use crate::queue::WriteQueue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub remaining: usize,
}

#[derive(Debug, Error)]
pub enum ReplayError<B, Q> {
    /// The failed write is still at the head of the queue.
    #[error("replay stopped at write {seq} after {applied} applied: {source}")]
    Backend {
        seq: u64,
        applied: usize,
        #[source]
        source: B,
    },

    #[error("offline queue error: {0}")]
    Queue(#[source] Q),
}

/// Drains `queue` into `backend` strictly in enqueue order.
///
/// Each write is acknowledged only after the backend accepts it. The first
/// backend failure stops the replay and leaves that write at the head.
pub async fn replay<Q, B>(queue: &Q, backend: &B) -> Result<ReplayReport, ReplayError<B::Error, Q::Error>>
where
    Q: WriteQueue,
    B: Backend,
{
    let mut applied = 0;

    while let Some(write) = queue.peek().map_err(ReplayError::<B::Error, Q::Error>::Queue)? {
        debug!(seq = write.seq, kind = write.op.kind(), "replaying queued write");

        if let Err(source) = backend.apply(&write.op).await {
            warn!(seq = write.seq, applied, error = %source, "replay stopped");
            return Err(ReplayError::Backend {
                seq: write.seq,
                applied,
                source,
            });
        }

        queue.ack(write.seq).map_err(ReplayError::<B::Error, Q::Error>::Queue)?;
        applied += 1;
    }

    info!(applied, "offline queue drained");
    Ok(ReplayReport {
        applied,
        remaining: 0,
    })
}

/// Replays only when `connectivity` reports online.
pub async fn replay_if_online<C, Q, B>(
    connectivity: &C,
    queue: &Q,
    backend: &B,
) -> Result<ReplayReport, ReplayError<B::Error, Q::Error>>
where
    C: Connectivity,
    Q: WriteQueue,
    B: Backend,
{
    if !connectivity.is_online() {
        let remaining = queue.len().map_err(ReplayError::<B::Error, Q::Error>::Queue)?;
        debug!(remaining, "offline, replay deferred");
        return Ok(ReplayReport {
            applied: 0,
            remaining,
        });
    }

    replay(queue, backend).await
}
