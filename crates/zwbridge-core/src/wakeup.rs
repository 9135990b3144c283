// ── Loop wake-up signal ──
//
// Producers signal after every push. Signals that arrive while the
// loop is busy collapse into a single pending wake, so the loop drains
// once per wake instead of once per notification.

use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct Wakeup {
    notify: Notify,
}

impl Wakeup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a drain. Safe from any thread; never blocks.
    pub fn signal(&self) {
        self.notify.notify_one();
    }

    /// Resolve once at least one signal arrived since the last wake.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}
