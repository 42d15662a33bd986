//! Snapshot type handed out by the cache.

use std::time::Instant;

/// Where an entry is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Created, first fetch not settled yet.
    Pending,
    /// Last fetch succeeded.
    Resolved,
    /// Last fetch failed. Earlier data, if any, is kept.
    Error,
}

/// A point-in-time copy of one cache entry.
///
/// Entries are owned by the [`CacheActor`](crate::cache::CacheActor); callers
/// only ever see clones, so holding a `CacheEntry` never blocks the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub data: Option<V>,
    pub status: EntryStatus,
    pub error: Option<String>,
    /// Marked by an invalidation; the data is a placeholder until the refetch lands.
    pub stale: bool,
    pub updated_at: Option<Instant>,
}

impl<K, V> CacheEntry<K, V> {
    /// True when the entry holds data that no invalidation has touched since
    /// it was fetched.
    pub fn is_fresh(&self) -> bool {
        self.status == EntryStatus::Resolved && !self.stale
    }

    /// True when the data shown is older than the latest invalidation.
    pub fn is_placeholder(&self) -> bool {
        self.data.is_some() && !self.is_fresh()
    }
}
