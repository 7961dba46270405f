//! Fjall-backed offline write queue for Beatplan.
//!
//! Writes are CBOR-encoded and keyed by their big-endian sequence number.
//! Head and tail cursors live in a separate keyspace, so a reopened queue
//! resumes exactly where the previous process stopped.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use beatplan_core::{Operation, QueuedWrite, WriteQueue};
use fjall::{Database, Keyspace, KeyspaceCreateOptions};
use thiserror::Error;
use tracing::trace;

pub const WRITES_KEYSPACE: &str = "writes";
pub const META_KEYSPACE: &str = "meta";

const HEAD_KEY: &[u8] = b"head";
const TAIL_KEY: &[u8] = b"tail";

#[derive(Debug, Error)]
pub enum FjallQueueError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("failed to encode queued write: {0}")]
    Encode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("failed to decode queued write: {0}")]
    Decode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("queued write {0} is missing from the store")]
    Missing(u64),

    #[error("corrupt {0} cursor")]
    CorruptCursor(&'static str),

    #[error("ack out of order: head is {head:?}, got {got}")]
    OutOfOrder { head: Option<u64>, got: u64 },
}

/// `head` is the oldest pending sequence number, `tail` the next one to assign.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    head: u64,
    tail: u64,
}

/// A durable FIFO queue of pending writes backed by Fjall.
pub struct FjallQueue {
    writes: Keyspace,
    meta: Keyspace,
    cursor: Mutex<Cursor>,
    database: Database,
}

impl FjallQueue {
    /// Opens the queue at the given path.
    ///
    /// Creates the database if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FjallQueueError> {
        let database = Database::builder(path).open()?;
        let writes = database.keyspace(WRITES_KEYSPACE, || KeyspaceCreateOptions::default())?;
        let meta = database.keyspace(META_KEYSPACE, || KeyspaceCreateOptions::default())?;

        let head = read_cursor(&meta, HEAD_KEY, "head")?;
        let tail = read_cursor(&meta, TAIL_KEY, "tail")?;
        if head > tail {
            return Err(FjallQueueError::CorruptCursor("head"));
        }

        Ok(Self {
            writes,
            meta,
            cursor: Mutex::new(Cursor { head, tail }),
            database,
        })
    }

    fn load(&self, seq: u64) -> Result<QueuedWrite, FjallQueueError> {
        let bytes = self
            .writes
            .get(seq_key(seq))?
            .map(|v| v.to_vec())
            .ok_or(FjallQueueError::Missing(seq))?;
        Ok(ciborium::from_reader(bytes.as_slice())?)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriteQueue for FjallQueue {
    type Error = FjallQueueError;

    fn enqueue(&self, op: &Operation) -> Result<u64, Self::Error> {
        let mut cursor = self.lock();
        let seq = cursor.tail;

        let mut bytes = Vec::new();
        ciborium::into_writer(
            &QueuedWrite {
                seq,
                op: op.clone(),
            },
            &mut bytes,
        )?;

        let mut batch = self.database.batch();
        batch.insert(&self.writes, seq_key(seq), bytes);
        batch.insert(&self.meta, TAIL_KEY.to_vec(), (seq + 1).to_be_bytes().to_vec());
        batch.commit()?;
        cursor.tail = seq + 1;

        trace!(seq, kind = op.kind(), "enqueued");
        Ok(seq)
    }

    fn peek(&self) -> Result<Option<QueuedWrite>, Self::Error> {
        let cursor = *self.lock();
        if cursor.head == cursor.tail {
            return Ok(None);
        }
        self.load(cursor.head).map(Some)
    }

    fn ack(&self, seq: u64) -> Result<(), Self::Error> {
        let mut cursor = self.lock();
        let head = (cursor.head < cursor.tail).then_some(cursor.head);
        if head != Some(seq) {
            return Err(FjallQueueError::OutOfOrder { head, got: seq });
        }

        // Cursor and record change together, so no acked write is left behind.
        let mut batch = self.database.batch();
        batch.insert(&self.meta, HEAD_KEY.to_vec(), (seq + 1).to_be_bytes().to_vec());
        batch.remove(&self.writes, seq_key(seq));
        batch.commit()?;
        cursor.head = seq + 1;

        trace!(seq, "acked");
        Ok(())
    }

    fn pending(&self) -> Result<Vec<QueuedWrite>, Self::Error> {
        let cursor = *self.lock();
        (cursor.head..cursor.tail).map(|seq| self.load(seq)).collect()
    }

    fn len(&self) -> Result<usize, Self::Error> {
        let cursor = *self.lock();
        Ok((cursor.tail - cursor.head) as usize)
    }
}

fn seq_key(seq: u64) -> Vec<u8> {
    seq.to_be_bytes().to_vec()
}

fn read_cursor(
    meta: &Keyspace,
    key: &[u8],
    name: &'static str,
) -> Result<u64, FjallQueueError> {
    let Some(value) = meta.get(key)? else {
        return Ok(0);
    };
    let bytes: [u8; 8] = value
        .to_vec()
        .try_into()
        .map_err(|_| FjallQueueError::CorruptCursor(name))?;
    Ok(u64::from_be_bytes(bytes))
}
