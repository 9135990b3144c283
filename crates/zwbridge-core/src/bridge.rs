// ── Bridge service ──
//
// Owns everything that used to be process-global: the controller
// handle, the shared queue and wake-up, the registries, the home id
// and the host sink. The controller's threads only ever see the
// `Shared` half (queue + wake-up) through the watcher closure; all
// other state is touched on the loop thread.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::command::route::Router;
use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::manager::{Manager, RawNotification, Watcher};
use crate::model::{Event, Notification};
use crate::normalize::Normalizer;
use crate::queue::NotificationQueue;
use crate::sink::EventSink;
use crate::store::Registry;
use crate::wakeup::Wakeup;

// ── ConnectionState ──────────────────────────────────────────────────

/// Whether a driver is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// The half of the bridge the controller's threads may touch.
#[derive(Default)]
struct Shared {
    queue: NotificationQueue,
    wakeup: Wakeup,
}

// ── Bridge ───────────────────────────────────────────────────────────

/// Bridges a [`Manager`] to a single-threaded host.
///
/// Construct with [`new()`](Self::new), call [`connect()`](Self::connect),
/// then either drive it with [`run()`](Self::run) or call
/// [`process_pending()`](Self::process_pending) from the host loop.
pub struct Bridge<S> {
    config: BridgeConfig,
    manager: Arc<dyn Manager>,
    shared: Arc<Shared>,
    registry: Arc<Registry>,
    home_id: Option<u32>,
    state: ConnectionState,
    sink: S,
    command_tx: mpsc::UnboundedSender<CommandEnvelope>,
    command_rx: mpsc::UnboundedReceiver<CommandEnvelope>,
}

impl<S: EventSink> Bridge<S> {
    /// Create a bridge and apply the manager options. Does NOT connect.
    pub fn new(
        manager: Arc<dyn Manager>,
        config: BridgeConfig,
        sink: S,
    ) -> Result<Self, BridgeError> {
        manager.configure(&config.options)?;
        debug!(options = ?config.options, "manager options applied");

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Ok(Self {
            config,
            manager,
            shared: Arc::new(Shared::default()),
            registry: Arc::new(Registry::new()),
            home_id: None,
            state: ConnectionState::Disconnected,
            sink,
            command_tx,
            command_rx,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Node and scene tables. Readable from any thread.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Home id learned from the first `driver ready`.
    pub fn home_id(&self) -> Option<u32> {
        self.home_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Notifications queued but not yet processed.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// A cloneable sender for commands. Commands are only executed while
    /// [`run()`](Self::run) is being polled.
    pub fn handle(&self) -> BridgeHandle {
        BridgeHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Register the watcher, attach the driver and emit `connected`.
    pub fn connect(&mut self) -> Result<(), BridgeError> {
        if self.state == ConnectionState::Connected {
            return Err(BridgeError::AlreadyConnected {
                device: self.config.device.clone(),
            });
        }

        // A fresh queue per session: a record still in flight from a
        // previous session's watcher lands in the old one.
        self.shared = Arc::new(Shared::default());
        let shared = Arc::clone(&self.shared);
        let watcher: Watcher = Arc::new(move |raw: &dyn RawNotification| {
            let notification = Notification::capture(raw);
            trace!(
                kind = %notification.kind,
                node_id = notification.node_id,
                "notification queued"
            );
            shared.queue.push(notification);
            shared.wakeup.signal();
        });
        self.manager.add_watcher(watcher);

        if let Err(err) = self.manager.add_driver(&self.config.device) {
            self.manager.remove_watcher();
            return Err(err.into());
        }

        self.state = ConnectionState::Connected;
        info!(device = %self.config.device, "connected");
        self.sink.emit(Event::Connected);
        Ok(())
    }

    /// Process anything still queued, detach from the controller and
    /// clear the node and scene tables. The home id is kept.
    pub fn disconnect(&mut self) -> Result<(), BridgeError> {
        if self.state == ConnectionState::Disconnected {
            return Err(BridgeError::NotConnected);
        }

        self.process_pending();
        self.manager.remove_watcher();
        let removed = self.manager.remove_driver(&self.config.device);
        // Anything fired between the drain and the watcher removal.
        self.drain_until_empty();
        self.registry.clear();
        self.state = ConnectionState::Disconnected;
        info!(device = %self.config.device, "disconnected");

        removed.map_err(BridgeError::from)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Take everything queued so far in one swap, normalize it and emit
    /// the resulting events in order. Returns the number of notifications
    /// processed.
    ///
    /// Notifications pushed while the batch is being processed stay
    /// queued for the next call; their wake-up signal is already pending.
    pub fn process_pending(&mut self) -> usize {
        let batch = self.shared.queue.drain_all();
        if batch.is_empty() {
            return 0;
        }
        debug!(count = batch.len(), "draining notifications");

        for notification in &batch {
            let event = Normalizer {
                manager: &*self.manager,
                registry: &self.registry,
                home_id: &mut self.home_id,
            }
            .normalize(notification);
            if let Some(event) = event {
                self.sink.emit(event);
            }
        }
        batch.len()
    }

    /// Repeat [`process_pending`](Self::process_pending) until a drain
    /// comes back empty.
    fn drain_until_empty(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.process_pending() {
                0 => return processed,
                n => processed += n,
            }
        }
    }

    /// Execute a command on the calling (loop) thread.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, BridgeError> {
        if self.state != ConnectionState::Connected {
            debug!(command = command.name(), "bridge not connected; command ignored");
            return Ok(CommandResult::Ignored);
        }

        let result = Router {
            manager: &*self.manager,
            registry: &self.registry,
            home_id: self.home_id,
            sink: &mut self.sink,
        }
        .route(command);

        if let Err(err) = &result {
            warn!(error = %err, "command failed");
        }
        result
    }

    /// Host-loop task: drain on every wake-up and execute commands from
    /// [`BridgeHandle`]s in arrival order, until `cancel` fires. Performs
    /// a final drain before returning the bridge.
    pub async fn run(mut self, cancel: CancellationToken) -> Self
    where
        S: Send,
    {
        let shared = Arc::clone(&self.shared);
        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                () = shared.wakeup.wait() => {
                    self.process_pending();
                }

                Some(envelope) = self.command_rx.recv() => {
                    // Keep commands ordered after notifications already queued.
                    self.process_pending();
                    let result = self.execute(envelope.command);
                    let _ = envelope.response_tx.send(result);
                }
            }
        }

        let drained = self.process_pending();
        debug!(drained, "run loop stopped");
        self
    }
}

impl<S> Drop for Bridge<S> {
    fn drop(&mut self) {
        if self.state == ConnectionState::Connected {
            self.manager.remove_watcher();
            if let Err(error) = self.manager.remove_driver(&self.config.device) {
                warn!(%error, "failed to remove driver on drop");
            }
        }
    }
}

// ── BridgeHandle ─────────────────────────────────────────────────────

/// Sends commands to a running [`Bridge`].
#[derive(Clone)]
pub struct BridgeHandle {
    command_tx: mpsc::UnboundedSender<CommandEnvelope>,
}

impl BridgeHandle {
    /// Queue a command for the loop thread and await its result.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, BridgeError> {
        let (tx, rx) = oneshot::channel();

        self.command_tx
            .send(CommandEnvelope {
                command,
                response_tx: tx,
            })
            .map_err(|_| BridgeError::Closed)?;

        rx.await.map_err(|_| BridgeError::Closed)?
    }
}
