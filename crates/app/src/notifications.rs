//! Transient user-visible messages.
//!
//! [`Notifier`] keeps the list of notifications currently on screen and
//! publishes every change on a broadcast channel. Each notification is
//! dismissed automatically after the configured timeout unless the user
//! dismisses it first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use notely_core::Timestamp;
use tokio::sync::broadcast;

use crate::config::DEFAULT_NOTIFICATION_TIMEOUT;

/// Buffer capacity for the notification channel.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub created_at: Timestamp,
}

/// A change to the set of visible notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed(u64),
}

/// Shared handle to the notification list. Clones see the same list.
#[derive(Clone)]
pub struct Notifier {
    active: Arc<Mutex<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    sender: broadcast::Sender<NotificationEvent>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            active: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            sender,
            timeout,
        }
    }

    /// Show a message and schedule its dismissal. Returns its id.
    ///
    /// Auto-dismissal needs a Tokio runtime; outside one the notification
    /// stays until dismissed by hand.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> u64 {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            severity,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;

        tracing::debug!(
            id,
            severity = severity.as_str(),
            message = %notification.message,
            "Notification shown",
        );
        self.lock().push(notification.clone());
        let _ = self.sender.send(NotificationEvent::Shown(notification));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let notifier = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(notifier.timeout).await;
                notifier.dismiss(id);
            });
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Info, message)
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let removed = {
            let mut active = self.lock();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            let _ = self.sender.send(NotificationEvent::Dismissed(id));
        }
        removed
    }

    /// Notifications not yet dismissed, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TIMEOUT)
    }
}
