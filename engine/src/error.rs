//! Error types for the conference engine.

use crate::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The two phases of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    /// Sending pending records to the remote store
    Push,
    /// Fetching the authoritative set from the remote store
    Pull,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Push => f.write_str("push"),
            SyncPhase::Pull => f.write_str("pull"),
        }
    }
}

/// Failure reported by a [`RemoteStore`](crate::RemoteStore) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote answered with a non-success status
    #[error("remote returned status {0}")]
    Status(u16),

    /// The response body could not be decoded
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// All possible errors from the conference engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Local cache errors
    #[error("record already exists: {0}")]
    DuplicateId(RecordId),

    // Sync errors
    #[error("sync failed during {phase} phase: {source}")]
    SyncFailed {
        phase: SyncPhase,
        #[source]
        source: RemoteError,
    },

    #[error("sync run ended without an outcome")]
    SyncInterrupted,

    #[error("sync needs a Tokio runtime to run on")]
    NoRuntime,
}

impl Error {
    pub(crate) fn sync_failed(phase: SyncPhase, source: RemoteError) -> Self {
        Error::SyncFailed { phase, source }
    }

    /// Phase that failed, if this is a remote failure.
    pub fn phase(&self) -> Option<SyncPhase> {
        match self {
            Error::SyncFailed { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
