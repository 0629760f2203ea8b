//! Tracked registry: the set of posts currently watched for deletion.
//!
//! The discovery loop inserts, the deletion loop removes, and nothing else
//! mutates it. Every operation is a single critical section over the map,
//! so a reader never sees a half-inserted or half-removed entry, and no
//! lock is ever held while a page is being fetched.

use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::post::PostRecord;

/// Concurrent `post_id -> PostRecord` map.
///
/// Construct once, wrap in an `Arc`, and hand the same instance to both
/// loops. Iteration order is insertion order, which keeps snapshots
/// deterministic; nothing relies on it semantically.
#[derive(Debug, Default)]
pub struct TrackedRegistry {
    posts: RwLock<IndexMap<String, PostRecord>>,
}

impl TrackedRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under `id` unless the id is already tracked.
    ///
    /// Returns false (and leaves the existing record untouched) when the id
    /// is present: the first writer wins.
    pub fn insert_if_absent(&self, id: impl Into<String>, record: PostRecord) -> bool {
        let mut posts = self.write();
        match posts.entry(id.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    /// Insert a record keyed by its own `post_id`.
    pub fn track(&self, record: PostRecord) -> bool {
        let id = record.post_id.clone();
        self.insert_if_absent(id, record)
    }

    /// Point-in-time copy of the tracked ids, safe to iterate without
    /// holding the registry.
    pub fn snapshot_keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Current record for `id`, if it is still tracked.
    pub fn get(&self, id: &str) -> Option<PostRecord> {
        self.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Stop tracking `id`. Removing an absent id is a no-op.
    ///
    /// Returns the removed record, so exactly one caller ever gets
    /// `Some` for a given insertion.
    pub fn remove(&self, id: &str) -> Option<PostRecord> {
        self.write().shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Each critical section is a single map call, so a panicking holder
    // cannot leave the map inconsistent; recover from poisoning.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, PostRecord>> {
        self.posts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, PostRecord>> {
        self.posts.write().unwrap_or_else(PoisonError::into_inner)
    }
}
