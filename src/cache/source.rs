//! # Query Sources
//!
//! The cache does not know how to load anything by itself. A [`QuerySource`]
//! tells it which keys exist, what a resolved value looks like, and how to
//! fetch one. The source is injected when the actor starts (see
//! [`CacheActor::run`](crate::cache::CacheActor::run)), so a source can hold
//! clients that were created after the cache itself.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Anything the [`CacheActor`](crate::cache::CacheActor) can read through.
///
/// The associated types keep the store type-safe: a cache of project pages
/// can only be asked for page keys, and hands back page rows.
#[async_trait]
pub trait QuerySource: Send + Sync + 'static {
    /// Identifies one cache entry (e.g. `(resource, page)`).
    type Key: Eq + Hash + Clone + Send + Sync + Debug + 'static;

    /// The resolved data stored for a key.
    type Value: Clone + Send + Sync + Debug + 'static;

    /// Failure reported by [`fetch`](QuerySource::fetch). Only its message is
    /// kept in the cache entry.
    type Error: Display + Send + 'static;

    /// Loads the value for `key`. Called from a spawned task, never from the
    /// actor loop itself.
    async fn fetch(&self, key: &Self::Key) -> Result<Self::Value, Self::Error>;
}
