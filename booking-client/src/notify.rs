//! User-facing notifications.
//!
//! Every controller reports outcomes here. Notifications expire after a
//! fixed display duration; the session schedules the expiry when one is
//! raised.

use std::collections::VecDeque;
use std::fmt;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        })
    }
}

/// Identifier used to expire a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
}

/// Visible notifications, oldest first.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    visible: VecDeque<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification and return its id.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.visible.push_back(Notification {
            id,
            message: message.into(),
            severity,
        });
        id
    }

    /// Remove an expired notification. Unknown ids are ignored.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        let before = self.visible.len();
        self.visible.retain(|n| n.id != id);
        self.visible.len() != before
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    /// Most recently raised notification still visible.
    pub fn latest(&self) -> Option<&Notification> {
        self.visible.back()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
