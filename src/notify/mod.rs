//! # Notifications
//!
//! The admin view reports the outcome of every write through a [`Notifier`].
//! How a notification is shown (toast, banner, log line) is up to the
//! implementation; forms only decide *what* to say.

pub mod mock;

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Surfaces a message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, kind: NotificationKind);
}

/// Writes notifications to the log. Used when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => info!(title, message, "Notification"),
            NotificationKind::Error => error!(title, message, "Notification"),
        }
    }
}
