use std::future::Future;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::operation::Operation;

/// Destination for writes when online, typically the hosted database.
///
/// Each call is a single, non-transactional write.
pub trait Backend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn apply(&self, op: &Operation) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<B: Backend> Backend for &B {
    type Error = B::Error;

    fn apply(&self, op: &Operation) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).apply(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("memory backend rejected {kind} (call {call})")]
pub struct MemoryBackendError {
    pub call: usize,
    pub kind: &'static str,
}

#[derive(Debug, Default)]
struct MemoryBackendState {
    calls: usize,
    fail_on_call: Option<usize>,
    applied: Vec<Operation>,
}

/// An in-memory backend that records applied writes.
///
/// Can be armed to reject one specific call, which makes partial failures
/// reproducible in tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryBackendState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the `call`-th apply (zero-based, counted from creation).
    pub fn failing_on_call(call: usize) -> Self {
        let backend = Self::default();
        backend.fail_on_call(Some(call));
        backend
    }

    pub fn fail_on_call(&self, call: Option<usize>) {
        self.lock().fail_on_call = call;
    }

    /// Writes accepted so far, in order.
    pub fn applied(&self) -> Vec<Operation> {
        self.lock().applied.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryBackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for MemoryBackend {
    type Error = MemoryBackendError;

    async fn apply(&self, op: &Operation) -> Result<(), Self::Error> {
        let mut state = self.lock();
        let call = state.calls;
        state.calls += 1;

        if state.fail_on_call == Some(call) {
            return Err(MemoryBackendError {
                call,
                kind: op.kind(),
            });
        }

        state.applied.push(op.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn op() -> Operation {
        Operation::SetBeatActive {
            beat_id: Uuid::nil(),
            active: true,
        }
    }

    async fn apply_through<B: Backend>(backend: B) -> Result<(), B::Error> {
        backend.apply(&op()).await
    }

    #[tokio::test]
    async fn records_applied_writes() {
        let backend = MemoryBackend::new();
        backend.apply(&op()).await.unwrap();
        apply_through(&backend).await.unwrap();
        assert_eq!(backend.applied(), vec![op(), op()]);
    }

    #[tokio::test]
    async fn armed_call_fails_once() {
        let backend = MemoryBackend::failing_on_call(1);
        backend.apply(&op()).await.unwrap();

        let err = backend.apply(&op()).await.unwrap_err();
        assert_eq!(err.call, 1);
        assert_eq!(err.kind, "set_beat_active");

        backend.apply(&op()).await.unwrap();
        assert_eq!(backend.applied().len(), 2);
    }
}
