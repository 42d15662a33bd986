//! # Query Cache
//!
//! A keyed store that sits between readers and a slow source (here, the
//! remote list endpoint). It gives three things to its callers:
//!
//! - **Read-through**: the first read of a key fetches it; later reads are
//!   served from memory.
//! - **Deduplication**: readers of a key that is already being fetched share
//!   that fetch.
//! - **Placeholder continuity**: invalidation marks entries stale instead of
//!   evicting them, so old data stays visible until the refetch replaces it.
//!
//! # Main Components
//!
//! - [`QuerySource`] - what the cache reads through
//! - [`CacheActor`] - owns the entries and runs the fetch bookkeeping
//! - [`CacheClient`] - cloneable handle with `read`, `read_fresh`, `prefetch`,
//!   `invalidate` and `peek`
//! - [`CacheEntry`] - snapshots handed back to callers
//!
//! # Testing
//!
//! See [`mock`] for a channel-driven source that lets tests control when each
//! fetch settles.

pub mod actor;
pub mod client;
pub mod entry;
pub mod error;
pub mod message;
pub mod mock;
pub mod source;

pub use actor::CacheActor;
pub use client::CacheClient;
pub use entry::{CacheEntry, EntryStatus};
pub use error::CacheError;
pub use message::{CacheRequest, Entry, ReadMode};
pub use source::QuerySource;
