//! # API Errors
//!
//! The single error shape the remote API reports: an HTTP-like status and a
//! human-readable message. The message is what the user sees in the error
//! notification, so backends should keep it short.

/// Failure reported by a [`ProjectApi`](crate::api::ProjectApi) call.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 404, e.g. editing a project that was deleted in the meantime.
    pub fn not_found(what: &str) -> Self {
        Self::new(404, format!("{what} not found"))
    }

    /// 422, the backend rejected the payload.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(422, message)
    }

    /// 503, the backend could not be reached at all.
    pub fn unavailable() -> Self {
        Self::new(503, "Service unavailable")
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}
