//! # Conference Engine
//!
//! An offline-first sync engine for short text records.
//!
//! Clients create records locally, read them back immediately, and
//! periodically reconcile with an authoritative remote store. The remote is
//! reached only through the two-operation [`RemoteStore`] contract, so any
//! transport (HTTP, a foreign-language callback, an in-memory double) can be
//! plugged in.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is an immutable `(id, content, created_at)` triple. Identity
//! is the id alone. Ids come from an [`IdGenerator`] and must be unique
//! across clients that have never talked to each other; the default
//! [`SaltedIdGenerator`] mixes a random per-process salt with a counter.
//!
//! ### Local Cache
//!
//! The [`LocalCache`] keeps records in display order and marks each one
//! pending until a sync confirms the remote holds it.
//!
//! ### Sync
//!
//! [`SyncManager::sync`] pushes the pending records, then pulls the full
//! remote set and reconciles the cache with it. Either phase failing leaves
//! the cache untouched. Concurrent calls coalesce onto the run in flight.
//!
//! ## Quick Start
//!
//! ```rust
//! use conference_engine::{InMemoryRemote, SyncManager};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> conference_engine::error::Result<()> {
//! let remote = Arc::new(InMemoryRemote::new());
//! let manager = SyncManager::new(Arc::clone(&remote));
//!
//! manager.write("Hello")?;
//! assert_eq!(manager.get(), vec!["Hello"]);
//!
//! manager.sync().await?;
//! assert_eq!(remote.len(), 1);
//! assert_eq!(manager.pending_count(), 0);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod error;
pub mod id;
pub mod manager;
pub mod record;
pub mod remote;

// Re-export main types at crate root
pub use cache::{CacheEntry, LocalCache, ReconcileOutcome};
pub use clock::{Clock, LogicalClock, SystemClock};
pub use error::{Error, RemoteError, SyncPhase};
pub use id::{IdGenerator, SaltedIdGenerator, SequentialIdGenerator, MAX_SAFE_ID};
pub use manager::{SyncManager, SyncReport, SyncState};
pub use record::Record;
pub use remote::{InMemoryRemote, RemoteStore};

/// Type aliases for clarity
pub type RecordId = u64;
pub type Timestamp = u64;
