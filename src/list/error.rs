//! Error types for the project list.

use crate::cache::CacheError;
use thiserror::Error;

/// A page transition that was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// Pages start at 1.
    #[error("Invalid page: {0}")]
    InvalidPage(u32),

    #[error("Already on the first page")]
    NoPreviousPage,

    /// The current page is not known to be full, or is still a placeholder.
    #[error("No next page")]
    NoNextPage,
}

/// Errors that can occur while reading list pages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("Cache unavailable: {0}")]
    Cache(#[from] CacheError),
}
