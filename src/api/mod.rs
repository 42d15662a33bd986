//! Remote project API: the trait the rest of the crate consumes, a
//! channel-backed client, and test mocks.

pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod service;

pub use client::ApiClient;
pub use error::ApiError;
pub use message::{ApiRequest, Reply};
pub use service::ProjectApi;
