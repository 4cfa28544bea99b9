//! Snapshot memoization
//!
//! Entries are tagged with the store revision they were computed at. A
//! lookup only hits when the caller's current revision matches, so any write
//! to a user's records retires every cached snapshot of that user.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{EnvelopeSnapshot, MonthId, UserId};

use super::ordering::MonthOrdering;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    user: UserId,
    month: MonthId,
    ordering: MonthOrdering,
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    revision: u64,
    snapshot: EnvelopeSnapshot,
}

/// Memoized snapshots keyed by user, target month and ordering
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: RwLock<HashMap<CacheKey, CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot if it was computed at `revision`
    pub fn get(
        &self,
        user: &UserId,
        month: MonthId,
        ordering: MonthOrdering,
        revision: u64,
    ) -> EnvelopeResult<Option<EnvelopeSnapshot>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| EnvelopeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let key = CacheKey {
            user: user.clone(),
            month,
            ordering,
        };
        Ok(entries
            .get(&key)
            .filter(|cached| cached.revision == revision)
            .map(|cached| cached.snapshot.clone()))
    }

    /// Store a snapshot, dropping the user's entries from older revisions
    pub fn put(
        &self,
        user: &UserId,
        ordering: MonthOrdering,
        revision: u64,
        snapshot: EnvelopeSnapshot,
    ) -> EnvelopeResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| EnvelopeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.retain(|key, cached| &key.user != user || cached.revision == revision);
        entries.insert(
            CacheKey {
                user: user.clone(),
                month: snapshot.month,
                ordering,
            },
            CachedSnapshot { revision, snapshot },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(month: &str) -> EnvelopeSnapshot {
        EnvelopeSnapshot {
            month: MonthId::parse(month).unwrap(),
            initialized: false,
            lines: Vec::new(),
        }
    }

    fn user(name: &str) -> UserId {
        UserId::parse(name).unwrap()
    }

    #[test]
    fn test_hit_only_at_same_revision() {
        let cache = SnapshotCache::new();
        let alice = user("alice");
        let jan = MonthId::parse("2024-01").unwrap();
        let ordering = MonthOrdering::Chronological;

        cache.put(&alice, ordering, 3, snapshot("2024-01")).unwrap();

        assert!(cache.get(&alice, jan, ordering, 3).unwrap().is_some());
        assert!(cache.get(&alice, jan, ordering, 4).unwrap().is_none());
        assert!(cache
            .get(&alice, jan, MonthOrdering::CreationOrder, 3)
            .unwrap()
            .is_none());
        assert!(cache.get(&user("bob"), jan, ordering, 3).unwrap().is_none());
    }

    #[test]
    fn test_put_prunes_stale_entries_of_same_user() {
        let cache = SnapshotCache::new();
        let alice = user("alice");
        let bob = user("bob");
        let ordering = MonthOrdering::Chronological;

        cache.put(&alice, ordering, 1, snapshot("2024-01")).unwrap();
        cache.put(&alice, ordering, 1, snapshot("2024-02")).unwrap();
        cache.put(&bob, ordering, 7, snapshot("2024-01")).unwrap();
        assert_eq!(cache.len(), 3);

        cache.put(&alice, ordering, 2, snapshot("2024-03")).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
