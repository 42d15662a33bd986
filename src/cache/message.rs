//! # Cache Messages
//!
//! Requests sent from [`CacheClient`](crate::cache::CacheClient) to
//! [`CacheActor`](crate::cache::CacheActor). Every interaction with the store
//! goes through one of these, so the actor is the only code that ever touches
//! an entry.

use crate::cache::entry::CacheEntry;
use crate::cache::error::CacheError;
use crate::cache::source::QuerySource;
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the cache.
pub type Response<T> = oneshot::Sender<Result<T, CacheError>>;

/// Entry snapshot type for a given source.
pub type Entry<S> = CacheEntry<<S as QuerySource>::Key, <S as QuerySource>::Value>;

/// Selects keys for invalidation.
pub type KeyPredicate<K> = Box<dyn Fn(&K) -> bool + Send>;

/// How a read treats data that is older than the latest invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Hand back old data right away and refetch behind it.
    Continuity,
    /// Wait until a fetch of the current generation settles.
    Fresh,
}

pub enum CacheRequest<S: QuerySource> {
    Read {
        key: S::Key,
        mode: ReadMode,
        respond_to: Response<Entry<S>>,
    },
    /// No response: the caller never waits on a prefetch.
    Prefetch { key: S::Key },
    Invalidate {
        predicate: KeyPredicate<S::Key>,
        respond_to: Response<usize>,
    },
    Peek {
        key: S::Key,
        respond_to: Response<Option<Entry<S>>>,
    },
}

impl<S: QuerySource> fmt::Debug for CacheRequest<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheRequest::Read { key, mode, .. } => {
                f.debug_struct("Read").field("key", key).field("mode", mode).finish()
            }
            CacheRequest::Prefetch { key } => f.debug_struct("Prefetch").field("key", key).finish(),
            CacheRequest::Invalidate { .. } => f.write_str("Invalidate"),
            CacheRequest::Peek { key, .. } => f.debug_struct("Peek").field("key", key).finish(),
        }
    }
}
