use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::Operation;

/// A write parked in a queue, tagged with its enqueue sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedWrite {
    pub seq: u64,
    pub op: Operation,
}

/// FIFO queue of pending writes.
///
/// Sequence numbers grow monotonically and writes leave the queue strictly
/// in enqueue order: only the head may be acknowledged.
///
/// All methods take `&self` so implementations with internal locking can be
/// shared.
pub trait WriteQueue {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appends a write and returns its sequence number.
    fn enqueue(&self, op: &Operation) -> Result<u64, Self::Error>;

    /// The oldest pending write, if any.
    fn peek(&self) -> Result<Option<QueuedWrite>, Self::Error>;

    /// Removes the head write. `seq` must match the head's sequence number.
    fn ack(&self, seq: u64) -> Result<(), Self::Error>;

    /// All pending writes in FIFO order.
    fn pending(&self) -> Result<Vec<QueuedWrite>, Self::Error>;

    fn len(&self) -> Result<usize, Self::Error>;

    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.len()? == 0)
    }
}

impl<Q: WriteQueue> WriteQueue for &Q {
    type Error = Q::Error;

    fn enqueue(&self, op: &Operation) -> Result<u64, Self::Error> {
        (*self).enqueue(op)
    }

    fn peek(&self) -> Result<Option<QueuedWrite>, Self::Error> {
        (*self).peek()
    }

    fn ack(&self, seq: u64) -> Result<(), Self::Error> {
        (*self).ack(seq)
    }

    fn pending(&self) -> Result<Vec<QueuedWrite>, Self::Error> {
        (*self).pending()
    }

    fn len(&self) -> Result<usize, Self::Error> {
        (*self).len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryQueueError {
    #[error("ack out of order: head is {head:?}, got {got}")]
    OutOfOrder { head: Option<u64>, got: u64 },
}

#[derive(Debug, Default)]
struct MemoryQueueState {
    next_seq: u64,
    writes: VecDeque<QueuedWrite>,
}

/// An in-memory queue backed by a `VecDeque`.
///
/// Not durable. Useful for testing and as a reference implementation.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    state: Mutex<MemoryQueueState>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WriteQueue for MemoryQueue {
    type Error = MemoryQueueError;

    fn enqueue(&self, op: &Operation) -> Result<u64, Self::Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.writes.push_back(QueuedWrite {
            seq,
            op: op.clone(),
        });
        Ok(seq)
    }

    fn peek(&self) -> Result<Option<QueuedWrite>, Self::Error> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.writes.front().cloned())
    }

    fn ack(&self, seq: u64) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let head = state.writes.front().map(|w| w.seq);
        if head != Some(seq) {
            return Err(MemoryQueueError::OutOfOrder { head, got: seq });
        }
        state.writes.pop_front();
        Ok(())
    }

    fn pending(&self) -> Result<Vec<QueuedWrite>, Self::Error> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.writes.iter().cloned().collect())
    }

    fn len(&self) -> Result<usize, Self::Error> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.writes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn toggle(active: bool) -> Operation {
        Operation::SetBeatActive {
            beat_id: Uuid::nil(),
            active,
        }
    }

    #[test]
    fn memory_queue_fifo() {
        let queue = MemoryQueue::new();
        let first = queue.enqueue(&toggle(false)).unwrap();
        let second = queue.enqueue(&toggle(true)).unwrap();
        assert!(first < second);

        let pending = queue.pending().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].op, toggle(false));
        assert_eq!(pending[1].op, toggle(true));

        assert_eq!(queue.peek().unwrap().unwrap().seq, first);
        queue.ack(first).unwrap();
        assert_eq!(queue.peek().unwrap().unwrap().seq, second);
    }

    #[test]
    fn memory_queue_rejects_out_of_order_ack() {
        let queue = MemoryQueue::new();
        let first = queue.enqueue(&toggle(false)).unwrap();
        let second = queue.enqueue(&toggle(true)).unwrap();

        let err = queue.ack(second).unwrap_err();
        assert_eq!(
            err,
            MemoryQueueError::OutOfOrder {
                head: Some(first),
                got: second,
            }
        );
        assert_eq!(queue.len().unwrap(), 2);
    }

    #[test]
    fn memory_queue_empty() {
        let queue = MemoryQueue::new();
        assert!(queue.is_empty().unwrap());
        assert_eq!(queue.peek().unwrap(), None);
        assert!(queue.ack(0).is_err());
    }

    #[test]
    fn sequence_keeps_growing_after_drain() {
        let queue = MemoryQueue::new();
        let first = queue.enqueue(&toggle(true)).unwrap();
        queue.ack(first).unwrap();
        let next = queue.enqueue(&toggle(true)).unwrap();
        assert!(next > first);
    }
}
