//! Runtime setup: configuration and observability.
//!
//! - [`AdminConfig`] - page size and channel capacities for an
//!   [`AdminSystem`](crate::lifecycle::AdminSystem)
//! - [`setup_tracing`] - installs the tracing subscriber

pub mod config;
pub mod tracing;

pub use self::config::*;
pub use self::tracing::*;
