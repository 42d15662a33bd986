//! # Project Admin
//!
//! > **The data layer of a paginated CRUD admin view, built from actors.**
//!
//! The view lists projects a page at a time and adds or edits them through a
//! modal dialog. Reads go through a keyed query cache; writes go straight to
//! the backend and then invalidate every cached page, so the list refetches
//! while still showing the old rows.
//!
//! ## 🏗️ Data Flow
//!
//! ```text
//! ListController ──read/prefetch──▶ CacheActor ──fetch──▶ ProjectApi::list
//!       ▲                               ▲
//!       │ PageNavigator                 │ invalidate(projects)
//!       │                               │
//! FormDialog ──────create/update──────▶ ProjectApi ──▶ Notifier
//! ```
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. One owner per piece of state
//! The cache entries belong to the [`CacheActor`](cache::CacheActor) and the
//! backend store to the [`ProjectServer`](server::ProjectServer). Both process
//! one message at a time, so neither needs a lock. Everything else holds a
//! cloneable client.
//!
//! ### 2. Late binding
//! The cache's [`QuerySource`](cache::QuerySource) is passed to `run()`, not
//! `new()`, so the cache can be created before the API client it reads
//! through.
//!
//! ### 3. Explicit lifecycle
//! There is no global cache. [`AdminSystem`](lifecycle::AdminSystem) creates
//! it and [`shutdown`](lifecycle::AdminSystem::shutdown) ends it.
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields. See [`runtime::setup_tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`cache`] - generic read-through cache with deduplication, staleness and prefetch
//! - [`pages`] - page keys and the project list source
//! - [`list`] - pagination state and the list controller
//! - [`form`] - the add/edit dialog
//! - [`api`] - the backend contract, its channel client and mocks
//! - [`server`] - in-memory backend
//! - [`notify`] - user-facing notifications
//! - [`lifecycle`] / [`runtime`] - wiring, configuration, tracing
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod api;
pub mod cache;
pub mod form;
pub mod lifecycle;
pub mod list;
pub mod model;
pub mod notify;
pub mod pages;
pub mod runtime;
pub mod server;
