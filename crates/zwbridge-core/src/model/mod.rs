// ── Domain model ──

mod event;
mod node;
mod notification;
mod scene;
mod value;
mod value_id;

pub use event::Event;
pub use node::{NodeInfo, NodeRecord};
pub use notification::{DiagnosticCode, Notification, NotificationKind};
pub use scene::{SceneInfo, SceneSummary};
pub use value::{NormalizedValue, ScalarValue, ValuePayload};
pub use value_id::{UnknownValueType, ValueGenre, ValueId, ValueType};
