//! # Paged Project Queries
//!
//! Wires the generic [`cache`](crate::cache) to the project list endpoint.
//! A cache key is a [`PageKey`] `(resource, page)`; the page size is fixed
//! for the lifetime of a [`ProjectPages`] source, which is what makes a page
//! number a stable key.

use crate::api::{ApiError, ProjectApi};
use crate::cache::{CacheClient, CacheError, QuerySource};
use crate::model::Project;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Name of a resource collection. Keys of different resource types never
/// match each other's invalidations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType(pub &'static str);

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub const PROJECTS: ResourceType = ResourceType("projects");

/// Cache key of one list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub resource: ResourceType,
    pub page: u32,
}

impl PageKey {
    pub fn new(resource: ResourceType, page: u32) -> Self {
        Self { resource, page }
    }
}

/// A page request translated into the offset window the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub resource: ResourceType,
    pub page: u32,
    pub page_size: u32,
}

impl PageQuery {
    /// Returns `None` for page 0; pages start at 1.
    pub fn new(resource: ResourceType, page: u32, page_size: u32) -> Option<Self> {
        (page >= 1).then_some(Self {
            resource,
            page,
            page_size,
        })
    }

    /// Offset of the first row, or `None` when it does not fit in a `u32`.
    pub fn skip(&self) -> Option<u32> {
        (self.page - 1).checked_mul(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

/// [`QuerySource`] that loads project pages through [`ProjectApi::list`].
pub struct ProjectPages {
    api: Arc<dyn ProjectApi>,
    page_size: u32,
}

impl ProjectPages {
    pub fn new(api: Arc<dyn ProjectApi>, page_size: u32) -> Self {
        Self { api, page_size }
    }
}

#[async_trait]
impl QuerySource for ProjectPages {
    type Key = PageKey;
    type Value = Vec<Project>;
    type Error = ApiError;

    #[instrument(skip(self), fields(resource = %key.resource, page = key.page))]
    async fn fetch(&self, key: &PageKey) -> Result<Vec<Project>, ApiError> {
        let query = PageQuery::new(key.resource, key.page, self.page_size)
            .ok_or_else(|| ApiError::unprocessable("Page must be at least 1"))?;
        let skip = query
            .skip()
            .ok_or_else(|| ApiError::unprocessable("Page out of range"))?;
        debug!(skip, limit = query.limit(), "Listing");
        self.api.list(skip, query.limit()).await
    }
}

/// The cache handle used for project pages.
pub type PageCache = CacheClient<ProjectPages>;

/// Marks every cached page of `resource` stale. Returns how many were marked.
pub async fn invalidate_resource(cache: &PageCache, resource: ResourceType) -> Result<usize, CacheError> {
    cache.invalidate(move |key: &PageKey| key.resource == resource).await
}
