// Shared fixtures for the bridge integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use zwbridge_core::sim::{MemoryController, SimNetwork, SimNode, SimScene, SimSceneValue, SimValue};
use zwbridge_core::{
    Bridge, BridgeConfig, Event, Notification, NotificationKind, ScalarValue, ValueGenre, ValueId,
    ValueType,
};

pub const HOME: u32 = 100;
pub const DEVICE: &str = "/dev/ttyACM0";

pub fn value(class: u8, index: u8, value_type: ValueType, data: ScalarValue) -> SimValue {
    SimValue {
        genre: ValueGenre::User,
        command_class: class,
        instance: 1,
        index,
        value_type,
        label: format!("value {class}/{index}"),
        units: String::new(),
        read_only: false,
        write_only: false,
        min: 0,
        max: 255,
        items: Vec::new(),
        data: Some(data),
    }
}

/// Node 5: a dimmer (byte level, class 38) with a second instance of
/// class 38 at index 1 and a binary switch (class 37).
/// Node 7: a thermostat mode list (class 64) and a setpoint (class 67).
pub fn network() -> SimNetwork {
    let mut mode = value(64, 0, ValueType::List, ScalarValue::Text("Heat".into()));
    mode.items = vec!["Off".into(), "Heat".into(), "Cool".into()];

    SimNetwork {
        home_id: HOME,
        nodes: vec![
            SimNode {
                node_id: 5,
                manufacturer: "Aeotec".into(),
                product: "Dimmer 6".into(),
                node_type: "Multilevel Switch".into(),
                neighbors: vec![1, 7],
                values: vec![
                    value(38, 0, ValueType::Byte, ScalarValue::Int(7)),
                    value(38, 1, ValueType::Byte, ScalarValue::Int(99)),
                    value(37, 0, ValueType::Bool, ScalarValue::Bool(false)),
                ],
                ..SimNode::default()
            },
            SimNode {
                node_id: 7,
                manufacturer: "Honeywell".into(),
                node_type: "Thermostat".into(),
                neighbors: vec![1, 5],
                values: vec![
                    mode,
                    value(67, 1, ValueType::Decimal, ScalarValue::Float(20.5)),
                ],
                ..SimNode::default()
            },
        ],
        scenes: vec![SimScene {
            scene_id: 1,
            label: "Evening".into(),
            values: vec![SimSceneValue {
                node_id: 5,
                command_class: 38,
                instance: 1,
                index: 0,
                data: ScalarValue::Int(30),
            }],
        }],
    }
}

pub fn value_id(node_id: u8, class: u8, index: u8, value_type: ValueType) -> ValueId {
    ValueId {
        home_id: HOME,
        node_id,
        genre: ValueGenre::User,
        command_class: class,
        instance: 1,
        index,
        value_type,
    }
}

pub fn config() -> BridgeConfig {
    BridgeConfig {
        device: DEVICE.into(),
        ..BridgeConfig::default()
    }
}

/// A connected bridge collecting events into a `Vec`.
pub fn connected() -> (Arc<MemoryController>, Bridge<Vec<Event>>) {
    let controller = Arc::new(MemoryController::new(network()));
    let mut bridge = Bridge::new(controller.clone(), config(), Vec::new()).unwrap();
    bridge.connect().unwrap();
    bridge.sink_mut().clear();
    (controller, bridge)
}

/// A connected bridge that has processed the controller's start-up
/// sequence. The event log is cleared afterwards.
pub fn started() -> (Arc<MemoryController>, Bridge<Vec<Event>>) {
    let (controller, mut bridge) = connected();
    for n in controller.startup_sequence() {
        controller.fire(&n);
    }
    bridge.process_pending();
    bridge.sink_mut().clear();
    (controller, bridge)
}

pub fn notify(kind: NotificationKind, node_id: u8) -> Notification {
    Notification::new(kind, HOME, node_id)
}

pub fn names(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::name).collect()
}
