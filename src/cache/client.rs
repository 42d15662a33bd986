//! # Cache Client
//!
//! The handle every component uses to talk to the [`CacheActor`](crate::cache::CacheActor).

use crate::cache::error::CacheError;
use crate::cache::message::{CacheRequest, Entry, ReadMode};
use crate::cache::source::QuerySource;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A type-safe, cloneable handle to a running cache.
///
/// The client holds only a sender, so cloning is cheap and clones can be
/// shared between the list and every form dialog. When the last clone is
/// dropped the actor loop ends.
pub struct CacheClient<S: QuerySource> {
    sender: mpsc::Sender<CacheRequest<S>>,
}

impl<S: QuerySource> Clone for CacheClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: QuerySource> CacheClient<S> {
    pub fn new(sender: mpsc::Sender<CacheRequest<S>>) -> Self {
        Self { sender }
    }

    /// Read-through lookup with placeholder continuity.
    ///
    /// Fresh data is returned without a fetch. Stale data is returned at once
    /// (with `stale = true`) while a refetch runs behind it. A key with no data
    /// yet waits for its first fetch, shared with any other reader of the key.
    pub async fn read(&self, key: S::Key) -> Result<Entry<S>, CacheError> {
        self.read_with(key, ReadMode::Continuity).await
    }

    /// Like [`read`](Self::read), but never returns data older than the latest
    /// invalidation: waits for the refetch instead.
    pub async fn read_fresh(&self, key: S::Key) -> Result<Entry<S>, CacheError> {
        self.read_with(key, ReadMode::Fresh).await
    }

    async fn read_with(&self, key: S::Key, mode: ReadMode) -> Result<Entry<S>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Read {
                key,
                mode,
                respond_to,
            })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }

    /// Best-effort warm-up of `key`.
    ///
    /// Does not wait for the fetch, nor for channel space: if the cache is
    /// busy or gone the prefetch is simply dropped. Fetch failures are never
    /// reported.
    pub fn prefetch(&self, key: S::Key) {
        match self.sender.try_send(CacheRequest::Prefetch { key }) {
            Ok(()) => {}
            Err(TrySendError::Full(msg)) => debug!(?msg, "Prefetch dropped, cache busy"),
            Err(TrySendError::Closed(msg)) => debug!(?msg, "Prefetch dropped, cache closed"),
        }
    }

    /// Marks every entry whose key matches `predicate` as stale.
    ///
    /// Data is kept as a placeholder; the next read of each entry refetches.
    /// Returns the number of entries marked.
    pub async fn invalidate<F>(&self, predicate: F) -> Result<usize, CacheError>
    where
        F: Fn(&S::Key) -> bool + Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Invalidate {
                predicate: Box::new(predicate),
                respond_to,
            })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }

    /// Snapshot of `key` without triggering a fetch.
    pub async fn peek(&self, key: S::Key) -> Result<Option<Entry<S>>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Peek { key, respond_to })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)?
    }
}
