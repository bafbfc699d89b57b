//! JSON representation of records on the HTTP boundary.

use conference_engine::Record;
use serde::{Deserialize, Serialize};

/// A record as the remote serves and accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    pub content: String,
    pub id: u64,
    pub time_created: u64,
}

impl From<Record> for WireRecord {
    fn from(record: Record) -> Self {
        Self {
            content: record.content,
            id: record.id,
            time_created: record.created_at,
        }
    }
}

impl From<WireRecord> for Record {
    fn from(wire: WireRecord) -> Self {
        Record::new(wire.id, wire.content, wire.time_created)
    }
}
