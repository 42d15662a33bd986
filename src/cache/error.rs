//! # Cache Errors
//!
//! Failures of the cache plumbing itself. A failed *fetch* is not an error at
//! this level: it is recorded in the entry as
//! [`EntryStatus::Error`](crate::cache::EntryStatus::Error).

/// Errors returned by [`CacheClient`](crate::cache::CacheClient) calls.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache actor closed")]
    ActorClosed,
    #[error("Cache actor dropped response channel")]
    ActorDropped,
}
