//! Page-level notifications with expiry

use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Error,
    Warning,
    /// The URL may have been cut short by the browser
    TruncationWarning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub text: String,
    #[serde(skip)]
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Queue of live notifications, oldest first
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    pub fn push(
        &mut self,
        kind: NotificationKind,
        text: impl Into<String>,
        ttl: Duration,
        now: Instant,
    ) -> &Notification {
        self.next_id += 1;
        self.items.push(Notification {
            id: self.next_id,
            kind,
            text: text.into(),
            expires_at: now + ttl,
        });
        &self.items[self.items.len() - 1]
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before - self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
