//! One expiring queue for every user-facing toast.
//!
//! Entries carry their own expiry; readers prune on access, so no timer task is needed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_TTL_SECS: i64 = 5;
const MAX_QUEUED: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Clone)]
pub struct NotificationQueue {
    entries: Arc<Mutex<VecDeque<Notification>>>,
    ttl: Duration,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            ttl,
        }
    }

    pub fn push(&self, level: Level, message: impl Into<String>) -> Uuid {
        self.push_at(level, message, Utc::now())
    }

    pub fn push_at(&self, level: Level, message: impl Into<String>, now: DateTime<Utc>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: now,
            // saturates instead of overflowing for far-future instants
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        let id = notification.id;
        debug!(level = ?level, message = %notification.message, "Notification queued");

        let mut entries = self.lock();
        entries.push_back(notification);
        while entries.len() > MAX_QUEUED {
            entries.pop_front();
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(Level::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(Level::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(Level::Warning, message)
    }

    /// Unexpired notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Utc::now())
    }

    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut entries = self.lock();
        entries.retain(|n| !n.is_expired_at(now));
        entries.iter().cloned().collect()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    /// Remove and return everything still active.
    pub fn drain(&self) -> Vec<Notification> {
        let now = Utc::now();
        let mut entries = self.lock();
        entries.drain(..).filter(|n| !n.is_expired_at(now)).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        // A poisoned queue only ever holds plain data; keep using it.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}
