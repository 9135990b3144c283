// ── Notification normalizer ──
//
// Turns one dequeued notification into at most one host event,
// updating the registries on the way. Runs on the loop thread only.
// Registry updates and event emission are independent: a value added
// for an unknown node is not attached, but still reported.

use tracing::{debug, info, warn};

use crate::manager::Manager;
use crate::marshal::{node_info, render_value};
use crate::model::{DiagnosticCode, Event, Notification, NotificationKind, ValueId};
use crate::store::Registry;

pub(crate) struct Normalizer<'a> {
    pub(crate) manager: &'a dyn Manager,
    pub(crate) registry: &'a Registry,
    pub(crate) home_id: &'a mut Option<u32>,
}

impl Normalizer<'_> {
    pub(crate) fn normalize(&mut self, n: &Notification) -> Option<Event> {
        let node_id = n.node_id;
        match n.kind {
            // ── Driver ───────────────────────────────────────────────
            NotificationKind::DriverReady => {
                match *self.home_id {
                    None => *self.home_id = Some(n.home_id),
                    Some(current) if current != n.home_id => {
                        warn!(
                            current,
                            reported = n.home_id,
                            "driver ready for a second network; keeping the first home id"
                        );
                    }
                    Some(_) => {}
                }
                info!(home_id = n.home_id, "driver ready");
                Some(Event::DriverReady { home_id: n.home_id })
            }
            NotificationKind::DriverFailed => {
                warn!("driver failed");
                Some(Event::DriverFailed)
            }

            // ── Nodes ────────────────────────────────────────────────
            NotificationKind::NodeAdded => {
                if !self.registry.add_node(n.home_id, node_id) {
                    debug!(node_id, "node already known");
                }
                Some(Event::NodeAdded { node_id })
            }
            NotificationKind::NodeNaming => Some(Event::NodeNaming {
                node_id,
                info: node_info(self.manager, n.home_id, node_id),
            }),
            NotificationKind::EssentialNodeQueriesComplete => Some(Event::NodeAvailable {
                node_id,
                info: node_info(self.manager, n.home_id, node_id),
            }),
            NotificationKind::NodeQueriesComplete => Some(Event::NodeReady {
                node_id,
                info: node_info(self.manager, n.home_id, node_id),
            }),
            NotificationKind::NodeEvent => Some(Event::NodeEvent {
                node_id,
                event: n.event.unwrap_or_default(),
            }),

            // ── Values ───────────────────────────────────────────────
            NotificationKind::ValueAdded => {
                let value = self.attached_value(n)?;
                if self.registry.attach_value(node_id, value).is_none() {
                    debug!(node_id, value_id = %value, "value added for unknown node");
                }
                Some(Event::ValueAdded {
                    node_id,
                    class_id: value.command_class,
                    value: render_value(self.manager, &value),
                })
            }
            NotificationKind::ValueChanged => {
                let value = self.attached_value(n)?;
                Some(Event::ValueChanged {
                    node_id,
                    class_id: value.command_class,
                    value: render_value(self.manager, &value),
                })
            }
            NotificationKind::ValueRefreshed => {
                let value = self.attached_value(n)?;
                Some(Event::ValueRefreshed {
                    node_id,
                    class_id: value.command_class,
                    value: render_value(self.manager, &value),
                })
            }
            NotificationKind::ValueRemoved => {
                let value = self.attached_value(n)?;
                if self.registry.detach_value(node_id, &value) != Some(true) {
                    debug!(node_id, value_id = %value, "removed value was not attached");
                }
                Some(Event::ValueRemoved {
                    node_id,
                    class_id: value.command_class,
                    instance: value.instance,
                    index: value.index,
                })
            }

            // ── Network ──────────────────────────────────────────────
            NotificationKind::AwakeNodesQueried
            | NotificationKind::AllNodesQueried
            | NotificationKind::AllNodesQueriedSomeDead => {
                info!(nodes = self.registry.node_count(), "network scan complete");
                Some(Event::ScanComplete)
            }
            NotificationKind::SceneEvent => Some(Event::SceneEvent {
                node_id,
                scene_id: n.scene_id.unwrap_or_default(),
            }),
            NotificationKind::Notification => {
                let code = n.code.unwrap_or_default();
                debug!(node_id, code = %DiagnosticCode::from(code), "controller notification");
                Some(Event::Notification { node_id, code })
            }

            // ── Swallowed ────────────────────────────────────────────
            NotificationKind::NodeNew
            | NotificationKind::NodeProtocolInfo
            | NotificationKind::PollingEnabled
            | NotificationKind::PollingDisabled
            | NotificationKind::Group => {
                debug!(node_id, kind = %n.kind, "intermediate notification");
                None
            }
            NotificationKind::NodeRemoved
            | NotificationKind::CreateButton
            | NotificationKind::DeleteButton
            | NotificationKind::ButtonOn
            | NotificationKind::ButtonOff
            | NotificationKind::DriverReset
            | NotificationKind::DriverRemoved
            | NotificationKind::ControllerCommand => {
                warn!(node_id, kind = %n.kind, "unhandled notification");
                None
            }
        }
    }

    fn attached_value(&self, n: &Notification) -> Option<ValueId> {
        if n.value.is_none() {
            warn!(node_id = n.node_id, kind = %n.kind, "value notification without a value");
        }
        n.value
    }
}
