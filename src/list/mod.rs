//! # Paginated Project List
//!
//! [`ListController`] is the read side of the admin view. It turns the
//! current page (owned by a [`PageNavigator`]) into a [`PageView`]: the rows
//! to draw, whether they are still loading or a placeholder, and whether the
//! Previous/Next controls are enabled.
//!
//! The backend never reports a total count, so "is there a next page" is
//! inferred: a page that came back full probably has a successor. When that
//! is the case the successor is prefetched, so advancing is usually served
//! from the cache.
//!
//! On a page transition the previous rows stay on screen, flagged as a
//! placeholder, until the new page resolves. While a placeholder is shown
//! Next is disabled.

pub mod error;
pub mod navigator;

pub use error::{ListError, NavigationError};
pub use navigator::PageNavigator;

use crate::cache::{Entry, EntryStatus};
use crate::model::Project;
use crate::pages::{PageCache, PageKey, ProjectPages, ResourceType};
use tracing::{debug, instrument};

/// What the list shows for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: u32,
    pub rows: Vec<Project>,
    pub status: EntryStatus,
    pub error: Option<String>,
    /// The rows are older than the page they are shown for: either a stale
    /// copy of this page or the rows of the page navigated away from.
    pub is_placeholder: bool,
}

impl PageView {
    fn loading(page: u32) -> Self {
        Self {
            page,
            rows: Vec::new(),
            status: EntryStatus::Pending,
            error: None,
            is_placeholder: false,
        }
    }

    fn from_entry(page: u32, entry: Entry<ProjectPages>) -> Self {
        let is_placeholder = entry.is_placeholder();
        Self {
            page,
            rows: entry.data.unwrap_or_default(),
            status: entry.status,
            error: entry.error,
            is_placeholder,
        }
    }

    /// True while there is nothing to draw but skeleton rows.
    pub fn is_loading(&self) -> bool {
        self.status == EntryStatus::Pending && self.rows.is_empty()
    }
}

/// Drives one paginated list over the page cache.
pub struct ListController {
    cache: PageCache,
    navigator: PageNavigator,
    resource: ResourceType,
    page_size: u32,
    view: PageView,
}

impl ListController {
    /// `page_size` must match the size the cache's [`ProjectPages`] source
    /// was built with.
    pub fn new(cache: PageCache, navigator: PageNavigator, resource: ResourceType, page_size: u32) -> Self {
        let view = PageView::loading(navigator.page());
        Self {
            cache,
            navigator,
            resource,
            page_size,
            view,
        }
    }

    /// The current page, as held by the navigator.
    pub fn page(&self) -> u32 {
        self.navigator.page()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    /// The last view produced by [`load`](Self::load), [`refresh`](Self::refresh)
    /// or a navigation.
    pub fn view(&self) -> &PageView {
        &self.view
    }

    /// Reads `page` through the cache without touching the view.
    ///
    /// Fresh pages come from memory; stale pages come back as placeholders
    /// while a refetch runs.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn page_data(&self, page: u32) -> Result<Entry<ProjectPages>, ListError> {
        if page < 1 {
            return Err(NavigationError::InvalidPage(page).into());
        }
        Ok(self.cache.read(PageKey::new(self.resource, page)).await?)
    }

    /// Loads the current page into the view.
    ///
    /// If the navigator moved while the read was in flight, the response is
    /// dropped and the view shows the newer page's placeholder instead.
    pub async fn load(&mut self) -> Result<&PageView, ListError> {
        let page = self.begin_load();
        let entry = self.page_data(page).await?;
        Ok(self.apply(page, entry))
    }

    /// Like [`load`](Self::load), but waits for data newer than the latest
    /// invalidation instead of showing a placeholder.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn refresh(&mut self) -> Result<&PageView, ListError> {
        let page = self.begin_load();
        let entry = self
            .cache
            .read_fresh(PageKey::new(self.resource, page))
            .await?;
        Ok(self.apply(page, entry))
    }

    pub fn has_previous_page(&self) -> bool {
        self.page() > 1
    }

    /// True only when the current page resolved full and is not a placeholder.
    pub fn has_next_page(&self) -> bool {
        self.view.page == self.page()
            && self.view.status == EntryStatus::Resolved
            && !self.view.is_placeholder
            && self.view.rows.len() == self.page_size as usize
    }

    /// Moves to the next page. Call [`load`](Self::load) to fetch it.
    pub fn advance(&mut self) -> Result<u32, NavigationError> {
        let next = self
            .page()
            .checked_add(1)
            .filter(|_| self.has_next_page())
            .ok_or(NavigationError::NoNextPage)?;
        self.go_to(next)
    }

    /// Moves to the previous page. Call [`load`](Self::load) to fetch it.
    pub fn retreat(&mut self) -> Result<u32, NavigationError> {
        if !self.has_previous_page() {
            return Err(NavigationError::NoPreviousPage);
        }
        self.go_to(self.page() - 1)
    }

    /// Jumps to `page`, keeping the current rows as a placeholder.
    pub fn go_to(&mut self, page: u32) -> Result<u32, NavigationError> {
        self.navigator.navigate(page)?;
        self.follow_navigation(page);
        Ok(page)
    }

    fn begin_load(&mut self) -> u32 {
        let page = self.page();
        self.follow_navigation(page);
        page
    }

    /// Carries the current rows over to `page` as a placeholder.
    fn follow_navigation(&mut self, page: u32) {
        if self.view.page == page {
            return;
        }
        debug!(from = self.view.page, to = page, "Page transition");
        let rows = std::mem::take(&mut self.view.rows);
        self.view = PageView {
            page,
            is_placeholder: !rows.is_empty(),
            rows,
            status: EntryStatus::Pending,
            error: None,
        };
    }

    fn apply(&mut self, page: u32, entry: Entry<ProjectPages>) -> &PageView {
        let current = self.page();
        if current != page {
            debug!(page, current, "Discarding response for a page navigated away from");
            self.follow_navigation(current);
            return &self.view;
        }

        self.view = PageView::from_entry(page, entry);
        if let Some(next) = page.checked_add(1).filter(|_| self.has_next_page()) {
            self.cache.prefetch(PageKey::new(self.resource, next));
        }
        &self.view
    }
}
