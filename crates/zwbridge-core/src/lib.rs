//! zwbridge-core: hands Z-Wave controller notifications from the
//! controller's own threads to a single-threaded host loop.
//!
//! The controller calls the bridge's watcher on its worker threads. The
//! watcher copies the notification into a [`NotificationQueue`] and
//! signals a [`Wakeup`]. The host loop drains the queue, normalizes each
//! notification against the [`Registry`] and hands the resulting
//! [`Event`]s to an [`EventSink`]. Host commands run on the same loop
//! through [`Bridge::execute`] or a [`BridgeHandle`].

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod manager;
pub mod marshal;
pub mod model;
pub mod queue;
pub mod sim;
pub mod sink;
pub mod store;
pub mod wakeup;

mod normalize;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::{Bridge, BridgeHandle, ConnectionState};
pub use command::{Command, CommandResult};
pub use config::{BridgeConfig, ManagerOptions};
pub use error::{BridgeError, ControllerError};
pub use manager::{Manager, RawNotification, Watcher};
pub use queue::NotificationQueue;
pub use sink::EventSink;
pub use store::Registry;
pub use wakeup::Wakeup;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DiagnosticCode, Event, NodeInfo, NodeRecord, NormalizedValue, Notification, NotificationKind,
    ScalarValue, SceneInfo, SceneSummary, ValueGenre, ValueId, ValuePayload, ValueType,
};
