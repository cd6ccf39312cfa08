//! # Notifier
//!
//! One-way channel for user-visible messages. The cart calls it on every
//! failed operation and never waits on or inspects the result.

use std::sync::Mutex;

use serde::Serialize;

/// Receiver of user-visible cart messages.
pub trait Notifier: Send + Sync {
    /// Reports a failed operation.
    fn notify_error(&self, message: &str);

    /// Reports a degraded outcome (the operation applied, something else
    /// did not). Falls back to `notify_error`.
    fn notify_warning(&self, message: &str) {
        self.notify_error(message);
    }
}

/// No-op notifier for headless use.
///
/// The command line uses it: a failed command is reported once, as the
/// `ApiError` printed by the binary.
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify_error(&self, _message: &str) {}
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
    Warning,
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Keeps every notification in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages recorded so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    fn record(&self, level: NotificationLevel, message: &str) {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                level,
                message: message.to_string(),
            });
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.record(NotificationLevel::Error, message);
    }

    fn notify_warning(&self, message: &str) {
        self.record(NotificationLevel::Warning, message);
    }
}
