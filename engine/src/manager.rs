//! Sync manager - owns the local cache and runs push-then-pull sync.
//!
//! # Protocol
//!
//! 1. Snapshot the pending records and push them (skipped when empty)
//! 2. Fetch the full authoritative set
//! 3. Reconcile the cache with it
//!
//! A failure in either phase leaves the cache exactly as it was.
//!
//! # Concurrency
//!
//! At most one run is in flight. A `sync()` issued while a run is in flight
//! does not start another one; it waits for the current run and receives a
//! copy of its outcome. The run itself executes on a spawned Tokio task, so a
//! caller that stops waiting does not cancel it.

use crate::{
    error::Result, Clock, Error, IdGenerator, LocalCache, Record, RecordId, RemoteStore,
    SaltedIdGenerator, SyncPhase, SystemClock,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Observable state of a [`SyncManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// No run in flight
    Idle,
    /// A push/pull run is in flight
    Syncing,
}

/// Result of a successful sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Records sent in the push phase
    pub pushed: usize,
    /// Records returned by the pull phase
    pub fetched: usize,
    /// Local records still awaiting confirmation after the run
    pub still_pending: usize,
}

type Outcome = Option<Result<SyncReport>>;

enum RunState {
    Idle,
    Syncing(watch::Receiver<Outcome>),
}

struct Shared<R, I, C> {
    remote: Arc<R>,
    ids: I,
    clock: C,
    cache: Mutex<LocalCache>,
    run: Mutex<RunState>,
}

/// Client-side sync engine.
///
/// Create one per client session and hand it to whatever owns the UI state.
/// The manager holds a shared reference to its remote store.
pub struct SyncManager<R, I = SaltedIdGenerator, C = SystemClock> {
    shared: Arc<Shared<R, I, C>>,
}

impl<R: RemoteStore> SyncManager<R> {
    /// Create a manager with random-salted ids and wall-clock timestamps.
    pub fn new(remote: Arc<R>) -> Self {
        Self::with_providers(remote, SaltedIdGenerator::new(), SystemClock)
    }
}

impl<R, I, C> SyncManager<R, I, C>
where
    R: RemoteStore,
    I: IdGenerator + 'static,
    C: Clock + 'static,
{
    /// Create a manager with explicit id and time sources.
    pub fn with_providers(remote: Arc<R>, ids: I, clock: C) -> Self {
        Self {
            shared: Arc::new(Shared {
                remote,
                ids,
                clock,
                cache: Mutex::new(LocalCache::new()),
                run: Mutex::new(RunState::Idle),
            }),
        }
    }

    /// The remote store this manager syncs against.
    pub fn remote(&self) -> &Arc<R> {
        &self.shared.remote
    }

    /// Create a record and add it to the cache as pending.
    ///
    /// Allowed while a sync is in flight; the record goes out with the next
    /// run whose push snapshot is taken after this call.
    pub fn write(&self, content: impl Into<String>) -> Result<RecordId> {
        let record = Record::create(content, &self.shared.ids, &self.shared.clock);
        let id = record.id;
        self.shared.cache.lock().insert(record)?;

        tracing::debug!(id, "record written");
        Ok(id)
    }

    /// Content of every cached record in display order.
    pub fn get(&self) -> Vec<String> {
        self.shared.cache.lock().snapshot()
    }

    /// Every cached record in display order.
    pub fn records(&self) -> Vec<Record> {
        self.shared.cache.lock().records()
    }

    /// Number of records awaiting confirmation.
    pub fn pending_count(&self) -> usize {
        self.shared.cache.lock().pending_count()
    }

    /// Whether a run is in flight.
    pub fn state(&self) -> SyncState {
        match *self.shared.run.lock() {
            RunState::Idle => SyncState::Idle,
            RunState::Syncing(_) => SyncState::Syncing,
        }
    }

    /// Push pending records, then pull and reconcile the authoritative set.
    ///
    /// Joins the in-flight run if there is one. Starting a run needs a Tokio
    /// runtime; without one this returns [`Error::NoRuntime`] and the manager
    /// stays idle.
    pub async fn sync(&self) -> Result<SyncReport> {
        let mut outcome = self.join_or_start()?;

        // Bound first: the watch borrow must end before `outcome` drops.
        let result = match outcome.wait_for(Option::is_some).await {
            Ok(done) => done.clone().unwrap_or(Err(Error::SyncInterrupted)),
            Err(_) => Err(Error::SyncInterrupted),
        };
        result
    }

    fn join_or_start(&self) -> Result<watch::Receiver<Outcome>> {
        let mut run = self.shared.run.lock();
        if let RunState::Syncing(outcome) = &*run {
            tracing::debug!("sync already in flight, joining it");
            return Ok(outcome.clone());
        }

        let runtime = Handle::try_current().map_err(|_| {
            tracing::warn!("sync called outside a Tokio runtime");
            Error::NoRuntime
        })?;

        let (tx, rx) = watch::channel(None);
        *run = RunState::Syncing(rx.clone());
        drop(run);

        // Owned by the task, so the state resets even if the task is dropped
        // before its first poll.
        let guard = IdleOnDrop(Arc::clone(&self.shared));
        runtime.spawn(async move {
            let result = guard.0.run_once().await;

            // Back to idle before publishing, so a caller that sees this
            // outcome and syncs again starts a fresh run.
            drop(guard);
            let _ = tx.send(Some(result));
        });

        Ok(rx)
    }
}

impl<R, I, C> Shared<R, I, C>
where
    R: RemoteStore,
    C: Clock,
{
    async fn run_once(&self) -> Result<SyncReport> {
        tracing::debug!("sync run started");

        let batch = self.cache.lock().pending_records();
        let pushed = batch.len();
        if batch.is_empty() {
            tracing::debug!("nothing pending, skipping push");
        } else {
            self.remote.push_batch(batch).await.map_err(|e| {
                tracing::warn!(error = %e, pushed, "push phase failed");
                Error::sync_failed(SyncPhase::Push, e)
            })?;
        }

        let server_records = self.remote.fetch_all().await.map_err(|e| {
            tracing::warn!(error = %e, "pull phase failed");
            Error::sync_failed(SyncPhase::Pull, e)
        })?;
        let fetched = server_records.len();

        for record in &server_records {
            self.clock.observe(record.created_at);
        }
        let outcome = self.cache.lock().reconcile(server_records);

        if outcome.duplicates_dropped > 0 {
            tracing::warn!(
                duplicates = outcome.duplicates_dropped,
                "remote returned repeated ids"
            );
        }
        tracing::info!(
            pushed,
            fetched,
            still_pending = outcome.still_pending,
            "sync run completed"
        );

        Ok(SyncReport {
            pushed,
            fetched,
            still_pending: outcome.still_pending,
        })
    }
}

/// Resets the run state to idle when the run finishes or its task unwinds.
struct IdleOnDrop<R, I, C>(Arc<Shared<R, I, C>>);

impl<R, I, C> Drop for IdleOnDrop<R, I, C> {
    fn drop(&mut self) {
        *self.0.run.lock() = RunState::Idle;
    }
}
