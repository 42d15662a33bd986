//! # Cache Actor
//!
//! The `CacheActor` owns every cache entry and processes requests one at a
//! time, so no entry ever needs a lock. Network work never runs inside the
//! loop: each fetch is spawned onto its own task and reports back through an
//! internal completion channel, which the loop drains alongside client
//! requests.
//!
//! ## Staleness generations
//!
//! Each entry carries a `generation` that an invalidation bumps. A fetch
//! remembers the generation it was issued for. This gives three guarantees:
//!
//! * at most one fetch per (key, generation) is in flight, so concurrent
//!   readers share one network call;
//! * a fetch that started before an invalidation settles as a
//!   pre-invalidation value: its data is stored, but the entry stays stale and
//!   the next read refetches;
//! * every fetch has a request number, and only the latest request for a key
//!   may settle it. Older responses are dropped.

use crate::cache::client::CacheClient;
use crate::cache::entry::{CacheEntry, EntryStatus};
use crate::cache::message::{CacheRequest, ReadMode, Response};
use crate::cache::source::QuerySource;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct InFlight {
    request: u64,
    generation: u64,
}

struct Waiter<K, V> {
    fresh_only: bool,
    respond_to: Response<CacheEntry<K, V>>,
}

/// Internal state for one key. Only [`CacheEntry`] snapshots leave the actor.
struct Slot<K, V> {
    data: Option<V>,
    status: EntryStatus,
    error: Option<String>,
    stale: bool,
    updated_at: Option<Instant>,
    generation: u64,
    in_flight: Option<InFlight>,
    waiters: Vec<Waiter<K, V>>,
}

impl<K: Clone, V: Clone> Slot<K, V> {
    fn new() -> Self {
        Self {
            data: None,
            status: EntryStatus::Pending,
            error: None,
            stale: false,
            updated_at: None,
            generation: 0,
            in_flight: None,
            waiters: Vec::new(),
        }
    }

    fn is_fresh(&self) -> bool {
        self.status == EntryStatus::Resolved && !self.stale
    }

    /// A fetch is needed unless the data is fresh or a fetch for the current
    /// generation is already running.
    fn needs_fetch(&self) -> bool {
        !self.is_fresh()
            && self
                .in_flight
                .as_ref()
                .map_or(true, |f| f.generation != self.generation)
    }

    fn snapshot(&self, key: &K) -> CacheEntry<K, V> {
        CacheEntry {
            key: key.clone(),
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            stale: self.stale,
            updated_at: self.updated_at,
        }
    }
}

/// Result of a spawned fetch, sent back into the actor loop.
struct Settled<S: QuerySource> {
    key: S::Key,
    request: u64,
    generation: u64,
    result: Result<S::Value, String>,
}

/// The keyed store behind every [`CacheClient`].
///
/// # Usage Pattern
///
/// 1.  **Create**: `CacheActor::new()` returns the actor and its client.
/// 2.  **Wire**: pass the [`QuerySource`] into `actor.run(source)`.
/// 3.  **Run**: spawn the loop; it exits once every client is dropped.
///
/// ```rust,ignore
/// let (actor, cache) = CacheActor::<ProjectPages>::new(32);
/// let handle = tokio::spawn(actor.run(ProjectPages::new(api, 5)));
/// let entry = cache.read(PageKey::new(PROJECTS, 1)).await?;
/// ```
pub struct CacheActor<S: QuerySource> {
    receiver: mpsc::Receiver<CacheRequest<S>>,
    store: HashMap<S::Key, Slot<S::Key, S::Value>>,
    next_request: u64,
}

impl<S: QuerySource> CacheActor<S> {
    /// Creates a new `CacheActor` and its associated `CacheClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full,
    /// client calls wait for space, except [`CacheClient::prefetch`], which
    /// gives up instead.
    pub fn new(buffer_size: usize) -> (Self, CacheClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_request: 0,
        };
        (actor, CacheClient::new(sender))
    }

    /// Runs the cache's event loop until the request channel closes.
    ///
    /// The `source` is injected here rather than in `new()`, so it may hold
    /// clients that were created after the cache.
    pub async fn run(mut self, source: S) {
        let source = Arc::new(source);
        let source_name = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(source = source_name, "Cache started");

        let (settle_tx, mut settle_rx) = mpsc::unbounded_channel::<Settled<S>>();

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg, &source, &settle_tx),
                    None => break,
                },
                Some(settled) = settle_rx.recv() => self.settle(settled, &source, &settle_tx),
            }
        }

        info!(source = source_name, size = self.store.len(), "Cache shutdown");
    }

    fn handle(
        &mut self,
        msg: CacheRequest<S>,
        source: &Arc<S>,
        settle_tx: &mpsc::UnboundedSender<Settled<S>>,
    ) {
        match msg {
            CacheRequest::Read {
                key,
                mode,
                respond_to,
            } => {
                let slot = self.store.entry(key.clone()).or_insert_with(Slot::new);
                if slot.is_fresh() {
                    debug!(?key, "Hit");
                    let _ = respond_to.send(Ok(slot.snapshot(&key)));
                    return;
                }

                let needs_fetch = slot.needs_fetch();
                match mode {
                    ReadMode::Continuity if slot.data.is_some() => {
                        debug!(?key, refetch = needs_fetch, "Placeholder");
                        let _ = respond_to.send(Ok(slot.snapshot(&key)));
                    }
                    _ => {
                        debug!(?key, ?mode, refetch = needs_fetch, "Waiting");
                        slot.waiters.push(Waiter {
                            fresh_only: mode == ReadMode::Fresh,
                            respond_to,
                        });
                    }
                }
                if needs_fetch {
                    self.issue_fetch(&key, source, settle_tx);
                }
            }
            CacheRequest::Prefetch { key } => {
                let slot = self.store.entry(key.clone()).or_insert_with(Slot::new);
                if slot.needs_fetch() {
                    debug!(?key, "Prefetch");
                    self.issue_fetch(&key, source, settle_tx);
                } else {
                    debug!(?key, "Prefetch skipped");
                }
            }
            CacheRequest::Invalidate {
                predicate,
                respond_to,
            } => {
                let mut marked = 0;
                for (key, slot) in self.store.iter_mut() {
                    if predicate(key) {
                        slot.stale = true;
                        slot.generation += 1;
                        marked += 1;
                    }
                }
                info!(marked, size = self.store.len(), "Invalidated");
                let _ = respond_to.send(Ok(marked));
            }
            CacheRequest::Peek { key, respond_to } => {
                let entry = self.store.get(&key).map(|slot| slot.snapshot(&key));
                let _ = respond_to.send(Ok(entry));
            }
        }
    }

    fn issue_fetch(
        &mut self,
        key: &S::Key,
        source: &Arc<S>,
        settle_tx: &mpsc::UnboundedSender<Settled<S>>,
    ) {
        let Some(slot) = self.store.get_mut(key) else {
            return;
        };
        self.next_request += 1;
        let request = self.next_request;
        let generation = slot.generation;
        if let Some(previous) = slot.in_flight.replace(InFlight {
            request,
            generation,
        }) {
            debug!(?key, superseded = previous.request, request, "Superseding fetch");
        }
        debug!(?key, request, generation, "Fetch");

        let source = Arc::clone(source);
        let settle_tx = settle_tx.clone();
        let key = key.clone();
        tokio::spawn(async move {
            // A panicking fetch still settles, as an error.
            let fetch = tokio::spawn({
                let key = key.clone();
                async move { source.fetch(&key).await.map_err(|e| e.to_string()) }
            });
            let result = match fetch.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(?key, request, error = %e, "Fetch aborted");
                    Err(format!("Fetch aborted: {e}"))
                }
            };
            // The actor may already be gone; nothing is waiting then.
            let _ = settle_tx.send(Settled {
                key,
                request,
                generation,
                result,
            });
        });
    }

    fn settle(
        &mut self,
        settled: Settled<S>,
        source: &Arc<S>,
        settle_tx: &mpsc::UnboundedSender<Settled<S>>,
    ) {
        let Settled {
            key,
            request,
            generation,
            result,
        } = settled;

        let Some(slot) = self.store.get_mut(&key) else {
            debug!(?key, request, "Response for discarded entry");
            return;
        };
        if slot.in_flight.as_ref().map(|f| f.request) != Some(request) {
            debug!(?key, request, "Discarding superseded response");
            return;
        }
        slot.in_flight = None;
        let outdated = generation != slot.generation;

        match result {
            Ok(value) => {
                slot.data = Some(value);
                slot.status = EntryStatus::Resolved;
                slot.error = None;
                slot.stale = outdated;
                slot.updated_at = Some(Instant::now());
                debug!(?key, request, outdated, "Resolved");
            }
            Err(error) if slot.waiters.is_empty() && slot.data.is_none() => {
                // Nobody saw this entry (a prefetch): forget it entirely.
                debug!(?key, request, %error, "Unobserved fetch failed");
                self.store.remove(&key);
                return;
            }
            Err(error) => {
                warn!(?key, request, %error, "Fetch failed");
                slot.status = EntryStatus::Error;
                slot.error = Some(error);
            }
        }

        let mut still_waiting = Vec::new();
        for waiter in std::mem::take(&mut slot.waiters) {
            if waiter.fresh_only && outdated {
                still_waiting.push(waiter);
            } else {
                let _ = waiter.respond_to.send(Ok(slot.snapshot(&key)));
            }
        }
        slot.waiters = still_waiting;

        if !slot.waiters.is_empty() {
            self.issue_fetch(&key, source, settle_tx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::mock::{create_mock_source, expect_fetch};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let (source, mut fetches) = create_mock_source::<u32, Vec<&'static str>>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(1).await }
        });
        let second = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(1).await }
        });

        let (key, responder) = expect_fetch(&mut fetches).await.expect("Expected a fetch");
        assert_eq!(key, 1);
        responder.send(Ok(vec!["a", "b"])).unwrap();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.data, Some(vec!["a", "b"]));
        assert_eq!(second.data, first.data);

        // No duplicate call was issued.
        assert!(tokio::time::timeout(Duration::from_millis(50), fetches.recv())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_fetch() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(7).await }
        });
        let (_, responder) = expect_fetch(&mut fetches).await.unwrap();
        responder.send(Ok(70)).unwrap();
        assert!(reader.await.unwrap().unwrap().is_fresh());

        let again = cache.read(7).await.unwrap();
        assert_eq!(again.data, Some(70));
        assert!(fetches.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_read_returns_placeholder_and_refetches() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(1).await }
        });
        let (_, responder) = expect_fetch(&mut fetches).await.unwrap();
        responder.send(Ok(1)).unwrap();
        reader.await.unwrap().unwrap();

        assert_eq!(cache.invalidate(|_| true).await.unwrap(), 1);

        // Old data comes back immediately, flagged stale.
        let placeholder = cache.read(1).await.unwrap();
        assert_eq!(placeholder.data, Some(1));
        assert!(placeholder.stale);
        assert!(placeholder.is_placeholder());

        // A second read while the refetch runs does not issue another call.
        let again = cache.read(1).await.unwrap();
        assert!(again.stale);

        let (_, responder) = expect_fetch(&mut fetches).await.expect("Expected a refetch");
        responder.send(Ok(2)).unwrap();

        let fresh = cache.read_fresh(1).await.unwrap();
        assert_eq!(fresh.data, Some(2));
        assert!(!fresh.stale);
        assert!(fetches.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fetch_in_flight_during_invalidation_stays_stale() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(1).await }
        });
        let (_, old_responder) = expect_fetch(&mut fetches).await.unwrap();

        cache.invalidate(|_| true).await.unwrap();

        old_responder.send(Ok(10)).unwrap();
        let entry = reader.await.unwrap().unwrap();
        assert_eq!(entry.data, Some(10));
        assert!(entry.stale, "pre-invalidation data must stay stale");

        // The next read is guaranteed a new fetch.
        let fresh = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read_fresh(1).await }
        });
        let (_, responder) = expect_fetch(&mut fetches).await.expect("Expected a refetch");
        responder.send(Ok(11)).unwrap();
        assert_eq!(fresh.await.unwrap().unwrap().data, Some(11));
    }

    #[tokio::test]
    async fn test_superseded_response_is_discarded() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read_fresh(1).await }
        });
        let (_, old_responder) = expect_fetch(&mut fetches).await.unwrap();

        // Invalidate while pending; a fresh read now needs a newer request.
        cache.invalidate(|_| true).await.unwrap();
        let second = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read_fresh(1).await }
        });
        let (_, new_responder) = expect_fetch(&mut fetches).await.unwrap();

        new_responder.send(Ok(2)).unwrap();
        old_responder.send(Ok(1)).unwrap();

        assert_eq!(first.await.unwrap().unwrap().data, Some(2));
        assert_eq!(second.await.unwrap().unwrap().data, Some(2));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let entry = cache.peek(1).await.unwrap().unwrap();
        assert_eq!(entry.data, Some(2), "the late response must not overwrite");
    }

    #[tokio::test]
    async fn test_failed_prefetch_is_discarded() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        cache.prefetch(3);
        let (_, responder) = expect_fetch(&mut fetches).await.unwrap();
        responder.send(Err("boom".to_string())).unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.peek(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_read_reports_error_status() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(4).await }
        });
        let (_, responder) = expect_fetch(&mut fetches).await.unwrap();
        responder.send(Err("offline".to_string())).unwrap();

        let entry = reader.await.unwrap().unwrap();
        assert_eq!(entry.status, EntryStatus::Error);
        assert_eq!(entry.error.as_deref(), Some("offline"));
        assert!(entry.data.is_none());
    }

    /// Panics on every fetch.
    struct PanickingSource;

    #[async_trait::async_trait]
    impl QuerySource for PanickingSource {
        type Key = u32;
        type Value = u32;
        type Error = String;

        async fn fetch(&self, key: &u32) -> Result<u32, String> {
            panic!("fetch of {key} blew up");
        }
    }

    #[tokio::test]
    async fn test_panicking_fetch_settles_as_error() {
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(PanickingSource));

        let first = tokio::time::timeout(Duration::from_secs(2), cache.read(1))
            .await
            .expect("read should settle")
            .unwrap();
        assert_eq!(first.status, EntryStatus::Error);
        assert!(first.error.unwrap().starts_with("Fetch aborted"));

        // The key is not stuck: the next read refetches and settles again.
        let second = tokio::time::timeout(Duration::from_secs(2), cache.read_fresh(1))
            .await
            .expect("read should settle")
            .unwrap();
        assert_eq!(second.status, EntryStatus::Error);
    }

    #[tokio::test]
    async fn test_dropped_responder_settles_as_error() {
        let (source, mut fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(source));

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.read(5).await }
        });
        let (_, responder) = expect_fetch(&mut fetches).await.unwrap();
        drop(responder);

        let entry = reader.await.unwrap().unwrap();
        assert_eq!(entry.status, EntryStatus::Error);
    }

    #[tokio::test]
    async fn test_client_errors_after_shutdown() {
        let (source, _fetches) = create_mock_source::<u32, u32>();
        let (actor, cache) = CacheActor::new(10);
        let handle = tokio::spawn(actor.run(source));

        let probe = cache.clone();
        drop(cache);
        handle.abort();
        let _ = handle.await;

        assert!(probe.peek(1).await.is_err());
    }
}
