//! Pure data structures (DTOs) exchanged with the remote project API.

pub mod project;

pub use project::*;
