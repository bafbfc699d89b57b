//! The remote store contract and an in-memory implementation.

use crate::{error::RemoteError, Record, RecordId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The authoritative collection the engine synchronizes against.
///
/// Implementations own transport, retries and timeouts. The engine relies on
/// two guarantees only:
/// - `push_batch` is idempotent on id: a known id is ignored, never
///   overwritten, never an error
/// - `fetch_all` returns a stable, deterministic order
pub trait RemoteStore: Send + Sync + 'static {
    /// Accept a batch of records; the batch succeeds or fails as a unit.
    fn push_batch(
        &self,
        records: Vec<Record>,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Fetch every record currently known to the remote.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Record>, RemoteError>> + Send;
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Record>,
    ids: HashSet<RecordId>,
    fail_push: Option<RemoteError>,
    fail_pull: Option<RemoteError>,
}

/// In-memory remote store keeping records in insertion order.
///
/// Behaves like the reference server: pushed records whose id is already
/// known are silently skipped. Failures can be scripted for the next push or
/// pull, which makes it useful as a test double.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    inner: Mutex<Inner>,
    pushes: AtomicUsize,
    fetches: AtomicUsize,
}

impl InMemoryRemote {
    /// Create an empty remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a remote pre-populated with records.
    pub fn seeded(records: impl IntoIterator<Item = Record>) -> Self {
        let remote = Self::new();
        remote.accept(records);
        remote
    }

    /// Make the next `push_batch` fail with `error`.
    pub fn fail_next_push(&self, error: RemoteError) {
        self.inner.lock().fail_push = Some(error);
    }

    /// Make the next `fetch_all` fail with `error`.
    pub fn fail_next_pull(&self, error: RemoteError) {
        self.inner.lock().fail_pull = Some(error);
    }

    /// Current records without counting as a fetch.
    pub fn records(&self) -> Vec<Record> {
        self.inner.lock().records.clone()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Check if the remote holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `push_batch` calls received, failed ones included.
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    /// Number of `fetch_all` calls received, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Append records with unknown ids; returns how many were added.
    fn accept(&self, records: impl IntoIterator<Item = Record>) -> usize {
        let mut inner = self.inner.lock();
        let mut added = 0;
        for record in records {
            if inner.ids.insert(record.id) {
                inner.records.push(record);
                added += 1;
            }
        }
        added
    }
}

impl RemoteStore for InMemoryRemote {
    async fn push_batch(&self, records: Vec<Record>) -> Result<(), RemoteError> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.inner.lock().fail_push.take() {
            return Err(error);
        }

        let offered = records.len();
        let added = self.accept(records);
        tracing::trace!(offered, added, "in-memory remote accepted batch");
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock();
        if let Some(error) = inner.fail_pull.take() {
            return Err(error);
        }
        Ok(inner.records.clone())
    }
}
