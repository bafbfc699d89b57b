//! Record type exchanged with the remote store.

use crate::{Clock, IdGenerator, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A single immutable text record.
///
/// Two records with the same `id` are the same logical entity, whatever their
/// content or creation time. `PartialEq` and `Hash` only look at `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Globally unique identifier, never reassigned
    pub id: RecordId,
    /// Text payload
    pub content: String,
    /// Creation time (milliseconds since epoch, or a logical tick)
    pub created_at: Timestamp,
}

impl Record {
    /// Build a record from already-known parts.
    pub fn new(id: RecordId, content: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
        }
    }

    /// Create a fresh record with a newly generated id, stamped with the
    /// clock's current time.
    pub fn create<I, C>(content: impl Into<String>, ids: &I, clock: &C) -> Self
    where
        I: IdGenerator + ?Sized,
        C: Clock + ?Sized,
    {
        Self {
            id: ids.next_id(),
            content: content.into(),
            created_at: clock.now(),
        }
    }

    /// Check whether two records agree on every field, not just identity.
    pub fn same_contents(&self, other: &Record) -> bool {
        self.id == other.id && self.content == other.content && self.created_at == other.created_at
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
