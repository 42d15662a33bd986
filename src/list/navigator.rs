//! # Page Navigation State
//!
//! The current page belongs to navigable UI state (the `?page=` search
//! parameter), not to the list. [`PageNavigator`] models that state as a
//! `watch` channel: the router side sets it, the list reads it, and anyone
//! can subscribe to changes.

use super::error::NavigationError;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PageNavigator {
    sender: Arc<watch::Sender<u32>>,
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageNavigator {
    /// Starts at `page`, or at 1 if `page` is 0.
    pub fn new(page: u32) -> Self {
        let (sender, _) = watch::channel(page.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Builds the state from a search string such as `?page=3&sort=name`.
    ///
    /// A missing, malformed or zero `page` falls back to 1.
    pub fn from_search(search: &str) -> Self {
        Self::new(parse_page(search))
    }

    pub fn page(&self) -> u32 {
        *self.sender.borrow()
    }

    /// Moves to `page`. Pages below 1 are rejected and leave the state alone.
    pub fn navigate(&self, page: u32) -> Result<(), NavigationError> {
        if page < 1 {
            return Err(NavigationError::InvalidPage(page));
        }
        let previous = self.sender.send_replace(page);
        debug!(from = previous, to = page, "Navigate");
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.sender.subscribe()
    }
}

fn parse_page(search: &str) -> u32 {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
