// ── Command routing ──
//
// One arm per command: resolve handles from the registries, make a
// single controller call, then update the local tables. Registry
// locks are released before the controller is called.

use tracing::{debug, info, warn};

use super::{Command, CommandResult};
use crate::error::BridgeError;
use crate::manager::Manager;
use crate::marshal::render_scene_value;
use crate::model::{Event, SceneInfo, ScalarValue, ValueId, ValuePayload};
use crate::sink::EventSink;
use crate::store::Registry;

pub(crate) struct Router<'a> {
    pub(crate) manager: &'a dyn Manager,
    pub(crate) registry: &'a Registry,
    pub(crate) home_id: Option<u32>,
    pub(crate) sink: &'a mut dyn EventSink,
}

impl Router<'_> {
    #[allow(clippy::too_many_lines)]
    pub(crate) fn route(&mut self, command: Command) -> Result<CommandResult, BridgeError> {
        let name = command.name();

        match command {
            // ── Values ───────────────────────────────────────────────
            Command::SetValue {
                node_id,
                class_id,
                instance,
                index,
                value,
            } => {
                let Some(target) = self.registry.find_value(node_id, class_id, instance, index)
                else {
                    return Ok(miss(name, node_id, "value"));
                };
                let Some(payload) = coerce(&target, &value) else {
                    return Ok(CommandResult::Ignored);
                };
                self.manager.set_value(&target, payload)?;
                Ok(CommandResult::Applied)
            }

            Command::EnablePoll { node_id, class_id } => {
                let Some(target) = self.registry.first_value_of_class(node_id, class_id) else {
                    return Ok(miss(name, node_id, "command class"));
                };
                self.manager.enable_poll(&target)?;
                self.registry.set_polling(node_id, true);
                Ok(CommandResult::Applied)
            }

            Command::DisablePoll { node_id, class_id } => {
                let Some(target) = self.registry.first_value_of_class(node_id, class_id) else {
                    return Ok(miss(name, node_id, "command class"));
                };
                self.manager.disable_poll(&target)?;
                self.registry.set_polling(node_id, false);
                Ok(CommandResult::Applied)
            }

            // ── Nodes ────────────────────────────────────────────────
            Command::SetLocation { node_id, location } => {
                let Some(home_id) = self.home_id else {
                    return Ok(no_home(name));
                };
                self.manager.set_node_location(home_id, node_id, &location);
                Ok(CommandResult::Applied)
            }

            Command::SetName { node_id, name: label } => {
                let Some(home_id) = self.home_id else {
                    return Ok(no_home(name));
                };
                self.manager.set_node_name(home_id, node_id, &label);
                Ok(CommandResult::Applied)
            }

            Command::GetNodeNeighbors { node_id } => {
                let Some(home_id) = self.home_id else {
                    return Ok(no_home(name));
                };
                if !self.registry.has_node(node_id) {
                    return Ok(miss(name, node_id, "node"));
                }
                let neighbors = self.manager.node_neighbors(home_id, node_id);
                self.sink.emit(Event::Neighbors { node_id, neighbors });
                Ok(CommandResult::Applied)
            }

            Command::SetConfigParam {
                home_id,
                node_id,
                param,
                value,
                size,
            } => {
                let Some(home_id) = home_id.or(self.home_id) else {
                    return Ok(no_home(name));
                };
                self.manager
                    .set_config_param(home_id, node_id, param, value, size)?;
                Ok(CommandResult::Applied)
            }

            // ── Network ──────────────────────────────────────────────
            Command::HardReset => self.with_home(name, |m, home| m.reset_controller(home)),
            Command::SoftReset => self.with_home(name, |m, home| m.soft_reset(home)),
            Command::SwitchAllOn => self.with_home(name, |m, home| m.switch_all_on(home)),
            Command::SwitchAllOff => self.with_home(name, |m, home| m.switch_all_off(home)),
            Command::HealNetworkNode {
                node_id,
                return_routes,
            } => self.with_home(name, |m, home| {
                m.heal_network_node(home, node_id, return_routes);
            }),
            Command::HealNetwork => self.with_home(name, |m, home| m.heal_network(home, true)),

            // ── Scenes ───────────────────────────────────────────────
            Command::CreateScene { label } => {
                let scene_id = self.manager.create_scene();
                if scene_id == 0 {
                    warn!(%label, "controller refused to create scene");
                    return Ok(CommandResult::Ignored);
                }
                self.manager.set_scene_label(scene_id, &label);
                self.registry.insert_scene(SceneInfo::new(scene_id, label));
                info!(scene_id, "scene created");
                Ok(CommandResult::Applied)
            }

            Command::RemoveScene { scene_id } => {
                if !self.registry.has_scene(scene_id) {
                    return Ok(scene_miss(name, scene_id));
                }
                self.manager.remove_scene(scene_id)?;
                self.registry.remove_scene(scene_id);
                Ok(CommandResult::Applied)
            }

            Command::GetScenes => {
                let count = self.manager.num_scenes();
                if count != self.registry.scene_count() {
                    debug!(
                        controller = count,
                        cached = self.registry.scene_count(),
                        "scene count changed; rebuilding scene table"
                    );
                    let scenes = self
                        .manager
                        .all_scenes()
                        .into_iter()
                        .map(|id| SceneInfo::new(id, self.manager.scene_label(id)))
                        .collect();
                    self.registry.replace_scenes(scenes);
                }
                let scenes = self.registry.scene_summaries();
                self.sink.emit(Event::ScenesList { scenes });
                Ok(CommandResult::Applied)
            }

            Command::SceneGetValues { scene_id } => {
                if !self.registry.has_scene(scene_id) {
                    return Ok(scene_miss(name, scene_id));
                }
                let values = self.manager.scene_values(scene_id);
                self.registry.set_scene_values(scene_id, values.clone());
                let values = values
                    .iter()
                    .map(|v| render_scene_value(self.manager, scene_id, v))
                    .collect();
                self.sink.emit(Event::SceneValuesList { values });
                Ok(CommandResult::Applied)
            }

            Command::AddSceneValue {
                scene_id,
                node_id,
                class_id,
                instance,
                index,
                value,
            } => {
                let Some(target) = self.registry.find_value(node_id, class_id, instance, index)
                else {
                    return Ok(miss(name, node_id, "value"));
                };
                let Some(payload) = coerce(&target, &value) else {
                    return Ok(CommandResult::Ignored);
                };
                self.manager.add_scene_value(scene_id, &target, payload)?;
                self.registry.attach_scene_value(scene_id, target);
                Ok(CommandResult::Applied)
            }

            Command::RemoveSceneValue {
                scene_id,
                node_id,
                class_id,
                instance,
                index,
            } => {
                let Some(target) =
                    self.registry
                        .scene_value(scene_id, node_id, class_id, instance, index)
                else {
                    return Ok(scene_miss(name, scene_id));
                };
                self.manager.remove_scene_value(scene_id, &target)?;
                self.registry.detach_scene_value(scene_id, &target);
                Ok(CommandResult::Applied)
            }

            Command::ActivateScene { scene_id } => {
                if !self.registry.has_scene(scene_id) {
                    return Ok(scene_miss(name, scene_id));
                }
                self.manager.activate_scene(scene_id)?;
                Ok(CommandResult::Applied)
            }
        }
    }

    /// Run a network-wide call that needs the home id.
    fn with_home(
        &self,
        name: &'static str,
        call: impl FnOnce(&dyn Manager, u32),
    ) -> Result<CommandResult, BridgeError> {
        let Some(home_id) = self.home_id else {
            return Ok(no_home(name));
        };
        call(self.manager, home_id);
        Ok(CommandResult::Applied)
    }
}

// ── Lookup helpers ───────────────────────────────────────────────────

fn coerce(target: &ValueId, value: &ScalarValue) -> Option<ValuePayload> {
    let payload = value.coerce(target.value_type);
    if payload.is_none() {
        warn!(value_id = %target, value_type = %target.value_type, "value type cannot be written");
    }
    payload
}

fn miss(command: &'static str, node_id: u8, what: &'static str) -> CommandResult {
    debug!(command, node_id, "lookup miss: {what} not found");
    CommandResult::Ignored
}

fn scene_miss(command: &'static str, scene_id: u8) -> CommandResult {
    debug!(command, scene_id, "lookup miss: scene not found");
    CommandResult::Ignored
}

fn no_home(command: &'static str) -> CommandResult {
    debug!(command, "lookup miss: no driver ready yet");
    CommandResult::Ignored
}
