//! # Mock Query Source
//!
//! Utilities for testing the cache without a real backend.
//!
//! [`create_mock_source`] returns a [`ChannelSource`] and the receiving end of
//! its fetch channel. Every fetch the cache issues arrives there as a
//! [`FetchRequest`], and the test decides when (and with what) to answer.
//! This makes in-flight states deterministic: a fetch stays pending until the
//! test sends on its responder.
//!
//! ```rust,ignore
//! let (source, mut fetches) = create_mock_source::<u32, String>();
//! let (actor, cache) = CacheActor::new(10);
//! tokio::spawn(actor.run(source));
//!
//! let reader = tokio::spawn(async move { cache.read(1).await });
//! let (key, responder) = expect_fetch(&mut fetches).await.unwrap();
//! responder.send(Ok(format!("value {key}"))).unwrap();
//! ```

use crate::cache::source::QuerySource;
use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};

/// One fetch issued by the cache, waiting for the test to answer it.
pub struct FetchRequest<K, V> {
    pub key: K,
    pub respond_to: oneshot::Sender<Result<V, String>>,
}

/// A [`QuerySource`] that forwards every fetch to a channel.
pub struct ChannelSource<K, V> {
    sender: mpsc::UnboundedSender<FetchRequest<K, V>>,
}

#[async_trait]
impl<K, V> QuerySource for ChannelSource<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + Debug + 'static,
    V: Clone + Send + Sync + Debug + 'static,
{
    type Key = K;
    type Value = V;
    type Error = String;

    async fn fetch(&self, key: &K) -> Result<V, String> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(FetchRequest {
                key: key.clone(),
                respond_to,
            })
            .map_err(|_| "mock source closed".to_string())?;
        response
            .await
            .map_err(|_| "mock fetch dropped".to_string())?
    }
}

/// Creates a channel-backed source and the receiver its fetches arrive on.
pub fn create_mock_source<K, V>() -> (ChannelSource<K, V>, mpsc::UnboundedReceiver<FetchRequest<K, V>>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelSource { sender }, receiver)
}

/// Waits for the next fetch and splits it into key and responder.
pub async fn expect_fetch<K, V>(
    receiver: &mut mpsc::UnboundedReceiver<FetchRequest<K, V>>,
) -> Option<(K, oneshot::Sender<Result<V, String>>)> {
    receiver
        .recv()
        .await
        .map(|request| (request.key, request.respond_to))
}
