//! Local cache - the in-memory record container.
//!
//! The cache holds every record the client knows about, in display order,
//! and tracks which of them the remote store has not confirmed yet.

use crate::{error::Result, Error, Record, RecordId};
use std::collections::HashSet;

/// A cached record together with its sync status.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The record
    pub record: Record,
    /// True until a successful sync confirms the remote has it
    pub pending: bool,
}

/// Summary of a [`LocalCache::reconcile`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Records now held as confirmed (the deduplicated server set)
    pub confirmed: usize,
    /// Local records the server set did not contain, kept as pending
    pub still_pending: usize,
    /// Server entries dropped because their id appeared earlier in the set
    pub duplicates_dropped: usize,
}

/// Ordered record store with pending tracking.
///
/// Invariants:
/// - entries stay in insertion order (oldest first) unless reconciled
/// - no two entries share an id
#[derive(Debug, Clone, Default)]
pub struct LocalCache {
    entries: Vec<CacheEntry>,
    ids: HashSet<RecordId>,
}

impl LocalCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record as pending.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        if !self.ids.insert(record.id) {
            return Err(Error::DuplicateId(record.id));
        }
        self.entries.push(CacheEntry {
            record,
            pending: true,
        });
        Ok(())
    }

    /// Content of every record in stored order.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.record.content.clone())
            .collect()
    }

    /// Records not yet confirmed by the remote, in insertion order.
    pub fn pending_records(&self) -> Vec<Record> {
        self.entries
            .iter()
            .filter(|e| e.pending)
            .map(|e| e.record.clone())
            .collect()
    }

    /// Replace the cache with the authoritative server set.
    ///
    /// Server records are stored in the order given and marked confirmed; a
    /// repeated id keeps its first occurrence. Pending local records missing
    /// from the server set are kept after it, still pending, so a write that
    /// raced a sync is not dropped.
    pub fn reconcile(&mut self, server_records: Vec<Record>) -> ReconcileOutcome {
        let mut ids = HashSet::with_capacity(server_records.len());
        let mut entries = Vec::with_capacity(server_records.len());
        let mut duplicates_dropped = 0;

        for record in server_records {
            if ids.insert(record.id) {
                entries.push(CacheEntry {
                    record,
                    pending: false,
                });
            } else {
                duplicates_dropped += 1;
            }
        }
        let confirmed = entries.len();

        // Carry over unconfirmed local writes
        for entry in self.entries.drain(..) {
            if entry.pending && ids.insert(entry.record.id) {
                entries.push(entry);
            }
        }
        let still_pending = entries.len() - confirmed;

        self.entries = entries;
        self.ids = ids;

        ReconcileOutcome {
            confirmed,
            still_pending,
            duplicates_dropped,
        }
    }

    /// All records in stored order.
    pub fn records(&self) -> Vec<Record> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    /// All entries in stored order.
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    /// Check if a record with this id is cached.
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Count of pending records.
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.pending).count()
    }

    /// Count of all records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: RecordId, content: &str) -> Record {
        Record::new(id, content, 1000 + id)
    }

    fn cache_with(records: &[(RecordId, &str)]) -> LocalCache {
        let mut cache = LocalCache::new();
        for (id, content) in records {
            cache.insert(record(*id, content)).unwrap();
        }
        cache
    }

    #[test]
    fn create_cache() {
        let cache = LocalCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert!(cache.snapshot().is_empty());
        assert!(cache.pending_records().is_empty());
    }

    #[test]
    fn insert_marks_pending() {
        let cache = cache_with(&[(1, "a"), (2, "b")]);

        assert_eq!(cache.snapshot(), vec!["a", "b"]);
        assert_eq!(cache.pending_count(), 2);
        assert!(cache.entries().iter().all(|e| e.pending));
        assert!(cache.contains(1));
        assert!(!cache.contains(3));
    }

    #[test]
    fn insert_duplicate() {
        let mut cache = cache_with(&[(1, "a")]);

        let result = cache.insert(record(1, "different"));
        assert_eq!(result, Err(Error::DuplicateId(1)));

        // Unchanged
        assert_eq!(cache.snapshot(), vec!["a"]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn pending_records_in_insertion_order() {
        let mut cache = cache_with(&[(3, "c"), (1, "a")]);
        cache.reconcile(vec![record(3, "c"), record(1, "a")]);
        cache.insert(record(9, "z")).unwrap();
        cache.insert(record(2, "b")).unwrap();

        let pending: Vec<_> = cache.pending_records().into_iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![9, 2]);
    }

    #[test]
    fn reconcile_replaces_and_clears_pending() {
        let mut cache = cache_with(&[(1, "a")]);

        let outcome = cache.reconcile(vec![record(5, "remote"), record(1, "a")]);

        assert_eq!(cache.snapshot(), vec!["remote", "a"]);
        assert_eq!(cache.pending_count(), 0);
        assert_eq!(
            outcome,
            ReconcileOutcome {
                confirmed: 2,
                still_pending: 0,
                duplicates_dropped: 0,
            }
        );
    }

    #[test]
    fn reconcile_takes_server_content_for_known_id() {
        let mut cache = cache_with(&[(1, "local")]);
        cache.reconcile(vec![record(1, "server")]);

        assert_eq!(cache.snapshot(), vec!["server"]);
    }

    #[test]
    fn reconcile_drops_confirmed_records_missing_from_server() {
        let mut cache = LocalCache::new();
        cache.reconcile(vec![record(1, "a"), record(2, "b")]);

        cache.reconcile(vec![record(2, "b")]);
        assert_eq!(cache.snapshot(), vec!["b"]);
        assert!(!cache.contains(1));
    }

    #[test]
    fn reconcile_keeps_unconfirmed_pending() {
        let mut cache = cache_with(&[(1, "a"), (2, "b"), (3, "c")]);

        let outcome = cache.reconcile(vec![record(7, "x"), record(2, "b")]);

        assert_eq!(cache.snapshot(), vec!["x", "b", "a", "c"]);
        let pending: Vec<_> = cache.pending_records().into_iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![1, 3]);
        assert_eq!(outcome.confirmed, 2);
        assert_eq!(outcome.still_pending, 2);
    }

    #[test]
    fn reconcile_collapses_duplicate_server_ids() {
        let mut cache = LocalCache::new();

        let outcome = cache.reconcile(vec![
            record(1, "first"),
            record(2, "other"),
            record(1, "second"),
        ]);

        assert_eq!(cache.snapshot(), vec!["first", "other"]);
        assert_eq!(outcome.duplicates_dropped, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn same_content_different_ids_are_both_kept() {
        let mut cache = LocalCache::new();
        cache.reconcile(vec![Record::new(1, "same", 5), Record::new(2, "same", 5)]);

        assert_eq!(cache.snapshot(), vec!["same", "same"]);
    }

    #[test]
    fn reconcile_with_empty_server_set() {
        let mut cache = LocalCache::new();
        cache.reconcile(vec![record(1, "a")]);
        cache.insert(record(2, "b")).unwrap();

        cache.reconcile(Vec::new());
        assert_eq!(cache.snapshot(), vec!["b"]);
        assert_eq!(cache.pending_count(), 1);
    }

    #[test]
    fn insert_after_reconcile_rejects_server_id() {
        let mut cache = LocalCache::new();
        cache.reconcile(vec![record(4112, "Hello world!")]);

        let result = cache.insert(record(4112, "again"));
        assert_eq!(result, Err(Error::DuplicateId(4112)));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_records() -> impl Strategy<Value = Vec<Record>> {
            prop::collection::vec((0u64..50, "[a-z]{0,6}"), 0..40).prop_map(|items| {
                items
                    .into_iter()
                    .map(|(id, content)| Record::new(id, content, id))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn prop_reconcile_preserves_server_order(server in arb_records()) {
                let mut cache = LocalCache::new();
                cache.reconcile(server.clone());

                let mut seen = HashSet::new();
                let expected: Vec<_> = server
                    .into_iter()
                    .filter(|r| seen.insert(r.id))
                    .map(|r| r.content)
                    .collect();
                prop_assert_eq!(cache.snapshot(), expected);
                prop_assert_eq!(cache.pending_count(), 0);
            }

            #[test]
            fn prop_ids_stay_unique(local in arb_records(), server in arb_records()) {
                let mut cache = LocalCache::new();
                for record in local {
                    let _ = cache.insert(record);
                }
                cache.reconcile(server);

                let ids: HashSet<_> = cache.records().into_iter().map(|r| r.id).collect();
                prop_assert_eq!(ids.len(), cache.len());
            }

            #[test]
            fn prop_reconcile_is_idempotent(server in arb_records()) {
                let mut once = LocalCache::new();
                once.reconcile(server.clone());

                let mut twice = once.clone();
                twice.reconcile(server);

                prop_assert_eq!(once.snapshot(), twice.snapshot());
            }

            #[test]
            fn prop_no_pending_write_is_lost(local in arb_records(), server in arb_records()) {
                let mut cache = LocalCache::new();
                let mut inserted = Vec::new();
                for record in local {
                    if cache.insert(record.clone()).is_ok() {
                        inserted.push(record.id);
                    }
                }
                cache.reconcile(server);

                for id in inserted {
                    prop_assert!(cache.contains(id));
                }
            }
        }
    }
}
