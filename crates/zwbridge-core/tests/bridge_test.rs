// Integration tests for the bridge lifecycle, dispatch and the
// notification-to-event pipeline, driven by the in-memory controller.
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use zwbridge_core::sim::{ManagerCall, MemoryController};
use zwbridge_core::{
    Bridge, BridgeError, ConnectionState, ControllerError, Event, EventSink, ManagerOptions,
    Manager, NotificationKind, ScalarValue, ValuePayload, ValueType,
};

use common::{HOME, config, connected, names, network, notify, started, value_id};

// ── Helpers ─────────────────────────────────────────────────────────

/// Sink for a controller that never goes quiet: every `node naming` it
/// receives makes the controller report the same node again.
struct Echo {
    controller: Arc<MemoryController>,
    emitted: usize,
    /// Cancel the run loop once this many echoes were emitted.
    stop: Option<(usize, CancellationToken)>,
}

impl Echo {
    fn new(controller: &Arc<MemoryController>, stop: Option<(usize, CancellationToken)>) -> Self {
        Self {
            controller: Arc::clone(controller),
            emitted: 0,
            stop,
        }
    }
}

impl EventSink for Echo {
    fn emit(&mut self, event: Event) {
        if let Event::NodeNaming { node_id, .. } = event {
            self.emitted += 1;
            if let Some((limit, cancel)) = &self.stop {
                if self.emitted == *limit {
                    cancel.cancel();
                }
            }
            self.controller
                .fire(&notify(NotificationKind::NodeNaming, node_id));
        }
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[test]
fn test_new_applies_options_once() {
    let controller = Arc::new(MemoryController::new(network()));
    let bridge = Bridge::new(controller.clone(), config(), Vec::new()).unwrap();
    assert_eq!(bridge.state(), ConnectionState::Disconnected);
    assert_eq!(
        controller.calls(),
        vec![ManagerCall::Configure(ManagerOptions::default())]
    );

    // Options are locked: a second bridge on the same controller fails.
    let err = Bridge::new(controller, config(), Vec::new()).err().unwrap();
    assert!(matches!(
        err,
        BridgeError::Controller(ControllerError::OptionsLocked)
    ));
}

#[test]
fn test_connect_emits_connected_and_registers_watcher() {
    let controller = Arc::new(MemoryController::new(network()));
    let mut bridge = Bridge::new(controller.clone(), config(), Vec::new()).unwrap();

    bridge.connect().unwrap();
    assert_eq!(bridge.state(), ConnectionState::Connected);
    assert!(controller.has_watcher());
    assert_eq!(controller.drivers(), vec![common::DEVICE.to_owned()]);
    assert_eq!(bridge.sink(), &vec![Event::Connected]);

    let err = bridge.connect().unwrap_err();
    assert!(matches!(err, BridgeError::AlreadyConnected { .. }));
}

#[test]
fn test_disconnect_processes_pending_then_clears_tables() {
    let (controller, mut bridge) = started();
    assert_eq!(bridge.registry().node_count(), 2);

    controller.fire(&notify(NotificationKind::NodeEvent, 5).with_event(3));
    bridge.disconnect().unwrap();

    assert_eq!(
        bridge.sink(),
        &vec![Event::NodeEvent {
            node_id: 5,
            event: 3
        }]
    );
    assert_eq!(bridge.state(), ConnectionState::Disconnected);
    assert!(!controller.has_watcher());
    assert!(controller.drivers().is_empty());
    assert_eq!(bridge.registry().node_count(), 0);
    assert_eq!(bridge.registry().scene_count(), 0);
    assert_eq!(bridge.home_id(), Some(HOME));

    // The controller can no longer reach the bridge.
    assert!(!controller.fire(&notify(NotificationKind::NodeAdded, 9)));
    assert!(matches!(
        bridge.disconnect().unwrap_err(),
        BridgeError::NotConnected
    ));
}

#[test]
fn test_reconnect_after_disconnect() {
    let (controller, mut bridge) = started();
    bridge.disconnect().unwrap();
    bridge.connect().unwrap();
    controller.fire(&notify(NotificationKind::NodeAdded, 5));
    bridge.process_pending();
    assert_eq!(bridge.registry().node_count(), 1);
}

#[test]
fn test_stale_delivery_does_not_reach_the_next_session() {
    let (controller, mut bridge) = connected();
    let stale = controller.watcher().unwrap();
    bridge.disconnect().unwrap();

    // A controller thread that picked up the old watcher finishes late.
    (*stale)(&notify(NotificationKind::NodeAdded, 9));

    bridge.connect().unwrap();
    assert_eq!(bridge.pending(), 0);
    assert_eq!(bridge.process_pending(), 0);
    assert!(!bridge.registry().has_node(9));
}

#[test]
fn test_drop_detaches_from_controller() {
    let (controller, bridge) = connected();
    drop(bridge);
    assert!(!controller.has_watcher());
    assert!(controller.drivers().is_empty());
}

// ── Dispatch ────────────────────────────────────────────────────────

#[test]
fn test_driver_ready_node_and_value_scenario() {
    let (controller, mut bridge) = connected();

    controller.fire(&notify(NotificationKind::DriverReady, 0));
    controller.fire(&notify(NotificationKind::NodeAdded, 5));
    controller.fire(
        &notify(NotificationKind::ValueAdded, 5).with_value(value_id(5, 38, 0, ValueType::Byte)),
    );

    assert_eq!(bridge.pending(), 3);
    assert_eq!(bridge.process_pending(), 3);
    assert_eq!(bridge.pending(), 0);

    let events = bridge.sink();
    assert_eq!(
        names(events),
        vec!["driver ready", "node added", "value added"]
    );
    assert_eq!(events[0].args(), vec![json!(HOME)]);
    assert_eq!(events[1].args(), vec![json!(5)]);

    let args = events[2].args();
    assert_eq!(args[0], json!(5));
    assert_eq!(args[1], json!(38));
    assert_eq!(args[2]["value"], json!(7));
    assert_eq!(args[2]["type"], json!("byte"));

    let nodes = bridge.registry().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].node_id, 5);
    assert_eq!(nodes[0].values, vec![value_id(5, 38, 0, ValueType::Byte)]);
}

#[test]
fn test_startup_sequence_is_filtered_and_ordered() {
    let (controller, mut bridge) = connected();
    for n in controller.startup_sequence() {
        controller.fire(&n);
    }
    bridge.process_pending();

    let per_node = |values: usize| {
        let mut expected = vec!["node added"];
        expected.extend(std::iter::repeat_n("value added", values));
        expected.extend(["node naming", "node available", "node ready"]);
        expected
    };
    let mut expected = vec!["driver ready"];
    expected.extend(per_node(3));
    expected.extend(per_node(2));
    expected.push("scan complete");

    assert_eq!(names(bridge.sink()), expected);
    assert_eq!(bridge.home_id(), Some(HOME));
    assert_eq!(bridge.registry().node(7).unwrap().values.len(), 2);
}

#[test]
fn test_one_drain_is_bounded_by_the_captured_batch() {
    let controller = Arc::new(MemoryController::new(network()));
    let sink = Echo::new(&controller, None);
    let mut bridge = Bridge::new(controller.clone(), config(), sink).unwrap();
    bridge.connect().unwrap();
    for _ in 0..3 {
        controller.fire(&notify(NotificationKind::NodeNaming, 5));
    }

    assert_eq!(bridge.process_pending(), 3);
    assert_eq!(bridge.sink().emitted, 3);
    // Reports that arrived during processing wait for the next drain.
    assert_eq!(bridge.pending(), 3);

    assert_eq!(bridge.process_pending(), 3);
    assert_eq!(bridge.sink().emitted, 6);
}

#[tokio::test]
async fn test_run_loop_stops_while_the_controller_keeps_reporting() {
    let controller = Arc::new(MemoryController::new(network()));
    let cancel = CancellationToken::new();
    let sink = Echo::new(&controller, Some((10, cancel.clone())));
    let mut bridge = Bridge::new(controller.clone(), config(), sink).unwrap();
    bridge.connect().unwrap();
    controller.fire(&notify(NotificationKind::NodeNaming, 5));

    let bridge = bridge.run(cancel).await;

    // Ten single-record batches, then the final drain.
    assert_eq!(bridge.sink().emitted, 11);
    assert_eq!(bridge.pending(), 1);
}

#[test]
fn test_value_changed_reads_live_value() {
    let (controller, mut bridge) = started();
    let level = value_id(5, 38, 0, ValueType::Byte);

    controller
        .update_value(&level, ScalarValue::Int(55))
        .unwrap();
    controller.fire(&notify(NotificationKind::ValueChanged, 5).with_value(level));
    bridge.process_pending();

    match &bridge.sink()[..] {
        [Event::ValueChanged { value, .. }] => {
            assert_eq!(value.value, Some(ValuePayload::Byte(55)));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn test_notifications_fired_from_a_worker_thread() {
    let (controller, mut bridge) = connected();
    let producer = {
        let controller = Arc::clone(&controller);
        std::thread::spawn(move || {
            for node_id in 1..=20 {
                controller.fire(&notify(NotificationKind::NodeAdded, node_id));
            }
        })
    };
    producer.join().unwrap();

    bridge.process_pending();
    let ids: Vec<u8> = bridge.sink().iter().filter_map(Event::node_id).collect();
    assert_eq!(ids, (1..=20).collect::<Vec<u8>>());
    assert_eq!(bridge.registry().node_count(), 20);
}

#[test]
fn test_node_table_subscription_sees_updates() {
    let (controller, mut bridge) = connected();
    let mut nodes = bridge.registry().subscribe_nodes();
    assert!(nodes.borrow_and_update().is_empty());

    controller.fire(&notify(NotificationKind::NodeAdded, 5));
    bridge.process_pending();

    assert!(nodes.has_changed().unwrap());
    assert_eq!(nodes.borrow_and_update()[0].node_id, 5);
}

#[test]
fn test_repeated_node_added_keeps_values() {
    let (controller, mut bridge) = started();
    controller.fire(&notify(NotificationKind::NodeAdded, 5));
    bridge.process_pending();

    assert_eq!(names(bridge.sink()), vec!["node added"]);
    assert_eq!(bridge.registry().node(5).unwrap().values.len(), 3);
}

#[test]
fn test_sink_can_be_a_channel() {
    let controller = Arc::new(MemoryController::new(network()));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut bridge = Bridge::new(controller.clone(), config(), tx).unwrap();
    bridge.connect().unwrap();
    controller.fire(&notify(NotificationKind::DriverReady, 0));
    bridge.process_pending();

    assert_eq!(rx.try_recv().unwrap(), Event::Connected);
    assert_eq!(rx.try_recv().unwrap(), Event::DriverReady { home_id: HOME });
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_manager_trait_is_object_safe() {
    let controller: Arc<dyn Manager> = Arc::new(MemoryController::new(network()));
    assert_eq!(controller.node_neighbors(HOME, 5), vec![1, 7]);
}
