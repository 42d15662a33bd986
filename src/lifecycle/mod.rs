//! Wiring and teardown of the admin view.
//!
//! [`AdminSystem`] constructs the page cache explicitly and owns its task, so
//! every cache has a clear owner and an explicit end.

pub mod admin_system;

pub use admin_system::*;
