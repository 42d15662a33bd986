//! Recording notifier for tests.

use super::{NotificationKind, Notifier};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// Keeps every notification it receives. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str, kind: NotificationKind) {
        self.received.lock().unwrap().push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            kind,
        });
    }
}
