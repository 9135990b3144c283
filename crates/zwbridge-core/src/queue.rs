// ── Cross-thread notification queue ──
//
// Multiple controller threads push; the loop thread drains. The lock
// is held only for the push or the swap, never while a notification
// is being processed.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::model::Notification;

/// Unbounded FIFO of captured notifications.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification. Never blocks on the consumer.
    pub fn push(&self, notification: Notification) {
        self.items.lock().push_back(notification);
    }

    /// Atomically take everything queued so far, oldest first.
    pub fn drain_all(&self) -> Vec<Notification> {
        let taken = std::mem::take(&mut *self.items.lock());
        taken.into()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}
