// ── Host events ──
//
// Everything the bridge tells the host goes through `Event`. Each
// variant has a fixed wire name and a positional argument list, so a
// host that only understands `(name, args...)` can forward it as-is.

use serde::Serialize;
use serde_json::Value;

use super::node::NodeInfo;
use super::scene::SceneSummary;
use super::value::NormalizedValue;

/// An event emitted to the host on the loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The driver for the configured device was added.
    Connected,
    DriverReady {
        home_id: u32,
    },
    DriverFailed,
    NodeAdded {
        node_id: u8,
    },
    NodeNaming {
        node_id: u8,
        info: NodeInfo,
    },
    ValueAdded {
        node_id: u8,
        class_id: u8,
        value: NormalizedValue,
    },
    ValueChanged {
        node_id: u8,
        class_id: u8,
        value: NormalizedValue,
    },
    ValueRefreshed {
        node_id: u8,
        class_id: u8,
        value: NormalizedValue,
    },
    ValueRemoved {
        node_id: u8,
        class_id: u8,
        instance: u8,
        index: u8,
    },
    /// Essential queries finished; the node can be addressed.
    NodeAvailable {
        node_id: u8,
        info: NodeInfo,
    },
    /// All queries finished for the node.
    NodeReady {
        node_id: u8,
        info: NodeInfo,
    },
    ScanComplete,
    NodeEvent {
        node_id: u8,
        event: u8,
    },
    SceneEvent {
        node_id: u8,
        scene_id: u8,
    },
    Notification {
        node_id: u8,
        code: u8,
    },
    ScenesList {
        scenes: Vec<SceneSummary>,
    },
    SceneValuesList {
        values: Vec<NormalizedValue>,
    },
    Neighbors {
        node_id: u8,
        neighbors: Vec<u8>,
    },
}

impl Event {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::DriverReady { .. } => "driver ready",
            Self::DriverFailed => "driver failed",
            Self::NodeAdded { .. } => "node added",
            Self::NodeNaming { .. } => "node naming",
            Self::ValueAdded { .. } => "value added",
            Self::ValueChanged { .. } => "value changed",
            Self::ValueRefreshed { .. } => "value refreshed",
            Self::ValueRemoved { .. } => "value removed",
            Self::NodeAvailable { .. } => "node available",
            Self::NodeReady { .. } => "node ready",
            Self::ScanComplete => "scan complete",
            Self::NodeEvent { .. } => "node event",
            Self::SceneEvent { .. } => "scene event",
            Self::Notification { .. } => "notification",
            Self::ScenesList { .. } => "scenes list",
            Self::SceneValuesList { .. } => "scene values list",
            Self::Neighbors { .. } => "neighbors",
        }
    }

    /// Positional arguments, in wire order.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::Connected | Self::DriverFailed | Self::ScanComplete => Vec::new(),
            Self::DriverReady { home_id } => vec![Value::from(*home_id)],
            Self::NodeAdded { node_id } => vec![Value::from(*node_id)],
            Self::NodeNaming { node_id, info }
            | Self::NodeAvailable { node_id, info }
            | Self::NodeReady { node_id, info } => vec![Value::from(*node_id), to_json(info)],
            Self::ValueAdded {
                node_id,
                class_id,
                value,
            }
            | Self::ValueChanged {
                node_id,
                class_id,
                value,
            }
            | Self::ValueRefreshed {
                node_id,
                class_id,
                value,
            } => vec![
                Value::from(*node_id),
                Value::from(*class_id),
                to_json(value),
            ],
            Self::ValueRemoved {
                node_id,
                class_id,
                instance,
                index,
            } => vec![
                Value::from(*node_id),
                Value::from(*class_id),
                Value::from(*instance),
                Value::from(*index),
            ],
            Self::NodeEvent { node_id, event } => {
                vec![Value::from(*node_id), Value::from(*event)]
            }
            Self::SceneEvent { node_id, scene_id } => {
                vec![Value::from(*node_id), Value::from(*scene_id)]
            }
            Self::Notification { node_id, code } => {
                vec![Value::from(*node_id), Value::from(*code)]
            }
            Self::ScenesList { scenes } => vec![to_json(scenes)],
            Self::SceneValuesList { values } => vec![to_json(values)],
            Self::Neighbors { node_id, neighbors } => {
                vec![Value::from(*node_id), to_json(neighbors)]
            }
        }
    }

    /// Node the event is about, if any.
    pub fn node_id(&self) -> Option<u8> {
        match self {
            Self::NodeAdded { node_id }
            | Self::NodeNaming { node_id, .. }
            | Self::ValueAdded { node_id, .. }
            | Self::ValueChanged { node_id, .. }
            | Self::ValueRefreshed { node_id, .. }
            | Self::ValueRemoved { node_id, .. }
            | Self::NodeAvailable { node_id, .. }
            | Self::NodeReady { node_id, .. }
            | Self::NodeEvent { node_id, .. }
            | Self::SceneEvent { node_id, .. }
            | Self::Notification { node_id, .. }
            | Self::Neighbors { node_id, .. } => Some(*node_id),
            Self::Connected
            | Self::DriverReady { .. }
            | Self::DriverFailed
            | Self::ScanComplete
            | Self::ScenesList { .. }
            | Self::SceneValuesList { .. } => None,
        }
    }
}

// Model types are plain data; serialization cannot fail.
fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
