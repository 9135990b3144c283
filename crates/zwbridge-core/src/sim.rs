// ── In-memory controller ──
//
// A `Manager` backed by a static network description. It keeps a log
// of every mutating call and lets callers fire notifications into the
// registered watcher from any thread, the way a real controller's
// worker threads would.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ManagerOptions;
use crate::error::ControllerError;
use crate::manager::{Manager, Watcher};
use crate::model::{
    Notification, NotificationKind, ScalarValue, ValueGenre, ValueId, ValuePayload, ValueType,
};

// ── Network description ──────────────────────────────────────────────

/// Static description of a simulated network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimNetwork {
    pub home_id: u32,
    #[serde(default)]
    pub nodes: Vec<SimNode>,
    #[serde(default)]
    pub scenes: Vec<SimScene>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimNode {
    pub node_id: u8,
    pub manufacturer: String,
    pub manufacturer_id: String,
    pub product: String,
    pub product_type: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    pub location: String,
    pub neighbors: Vec<u8>,
    pub values: Vec<SimValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimValue {
    #[serde(default = "default_genre")]
    pub genre: ValueGenre,
    pub command_class: u8,
    #[serde(default = "default_instance")]
    pub instance: u8,
    #[serde(default)]
    pub index: u8,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,
    #[serde(default)]
    pub min: i32,
    #[serde(default)]
    pub max: i32,
    /// Candidate labels for list values.
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub data: Option<ScalarValue>,
}

fn default_genre() -> ValueGenre {
    ValueGenre::User
}

fn default_instance() -> u8 {
    1
}

impl SimValue {
    fn value_id(&self, home_id: u32, node_id: u8) -> ValueId {
        ValueId {
            home_id,
            node_id,
            genre: self.genre,
            command_class: self.command_class,
            instance: self.instance,
            index: self.index,
            value_type: self.value_type,
        }
    }

    fn is(&self, id: &ValueId) -> bool {
        self.value_type == id.value_type && id.matches(self.command_class, self.instance, self.index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimScene {
    pub scene_id: u8,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub values: Vec<SimSceneValue>,
}

/// A scene's stored reading for one node value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSceneValue {
    pub node_id: u8,
    pub command_class: u8,
    #[serde(default = "default_instance")]
    pub instance: u8,
    #[serde(default)]
    pub index: u8,
    pub data: ScalarValue,
}

impl SimSceneValue {
    fn is(&self, id: &ValueId) -> bool {
        self.node_id == id.node_id && id.matches(self.command_class, self.instance, self.index)
    }
}

impl SimNetwork {
    fn node(&self, node_id: u8) -> Option<&SimNode> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    fn node_mut(&mut self, node_id: u8) -> Option<&mut SimNode> {
        self.nodes.iter_mut().find(|n| n.node_id == node_id)
    }

    fn value(&self, id: &ValueId) -> Option<&SimValue> {
        self.node(id.node_id)?.values.iter().find(|v| v.is(id))
    }

    fn value_mut(&mut self, id: &ValueId) -> Option<&mut SimValue> {
        self.node_mut(id.node_id)?
            .values
            .iter_mut()
            .find(|v| v.is(id))
    }

    fn scene(&self, scene_id: u8) -> Option<&SimScene> {
        self.scenes.iter().find(|s| s.scene_id == scene_id)
    }

    fn scene_mut(&mut self, scene_id: u8) -> Option<&mut SimScene> {
        self.scenes.iter_mut().find(|s| s.scene_id == scene_id)
    }

    /// Resolve a node value address to its handle.
    fn resolve(&self, node_id: u8, command_class: u8, instance: u8, index: u8) -> Option<ValueId> {
        self.node(node_id)?
            .values
            .iter()
            .find(|v| v.command_class == command_class && v.instance == instance && v.index == index)
            .map(|v| v.value_id(self.home_id, node_id))
    }
}

// ── Call log ─────────────────────────────────────────────────────────

/// A mutating call received by the [`MemoryController`].
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerCall {
    Configure(ManagerOptions),
    AddDriver(String),
    RemoveDriver(String),
    SetNodeLocation { node_id: u8, location: String },
    SetNodeName { node_id: u8, name: String },
    SetValue { value: ValueId, payload: ValuePayload },
    EnablePoll(ValueId),
    DisablePoll(ValueId),
    ResetController,
    SoftReset,
    SwitchAllOn,
    SwitchAllOff,
    HealNetworkNode { node_id: u8, do_return_routes: bool },
    HealNetwork { do_return_routes: bool },
    SetConfigParam { node_id: u8, param: u8, value: i32, size: Option<u8> },
    CreateScene(u8),
    RemoveScene(u8),
    ActivateScene(u8),
    SetSceneLabel { scene_id: u8, label: String },
    AddSceneValue { scene_id: u8, value: ValueId, payload: ValuePayload },
    RemoveSceneValue { scene_id: u8, value: ValueId },
}

// ── MemoryController ─────────────────────────────────────────────────

#[derive(Default)]
struct SimState {
    network: SimNetwork,
    options_locked: bool,
    drivers: Vec<String>,
    polled: HashSet<ValueId>,
    calls: Vec<ManagerCall>,
}

/// A [`Manager`] that simulates a controller in memory.
#[derive(Default)]
pub struct MemoryController {
    state: Mutex<SimState>,
    watcher: Mutex<Option<Watcher>>,
}

impl MemoryController {
    pub fn new(network: SimNetwork) -> Self {
        Self {
            state: Mutex::new(SimState {
                network,
                ..SimState::default()
            }),
            watcher: Mutex::new(None),
        }
    }

    pub fn home_id(&self) -> u32 {
        self.state.lock().network.home_id
    }

    /// Every mutating call received so far, oldest first.
    pub fn calls(&self) -> Vec<ManagerCall> {
        self.state.lock().calls.clone()
    }

    pub fn drivers(&self) -> Vec<String> {
        self.state.lock().drivers.clone()
    }

    pub fn has_watcher(&self) -> bool {
        self.watcher.lock().is_some()
    }

    pub fn is_polled(&self, value: &ValueId) -> bool {
        self.state.lock().polled.contains(value)
    }

    /// The registered watcher. A controller thread that picked it up
    /// before a removal keeps calling it until its delivery finishes.
    pub fn watcher(&self) -> Option<Watcher> {
        self.watcher.lock().clone()
    }

    /// Deliver a notification to the watcher on the calling thread.
    /// Returns `false` when no watcher is registered.
    pub fn fire(&self, notification: &Notification) -> bool {
        // Clone out so the watcher runs without our lock held.
        match self.watcher() {
            Some(watcher) => {
                (*watcher)(notification);
                true
            }
            None => false,
        }
    }

    /// Handle for a node value address, if the network has it.
    pub fn value_id(&self, node_id: u8, command_class: u8, instance: u8, index: u8) -> Option<ValueId> {
        self.state
            .lock()
            .network
            .resolve(node_id, command_class, instance, index)
    }

    /// Change a live reading, as a device report would.
    pub fn update_value(&self, value: &ValueId, data: ScalarValue) -> Result<(), ControllerError> {
        let mut state = self.state.lock();
        let sim = state
            .network
            .value_mut(value)
            .ok_or_else(|| unknown_value(value))?;
        sim.data = Some(data);
        Ok(())
    }

    /// The notifications a controller sends while it brings the network
    /// up: driver ready, then each node with its values, then the
    /// all-queried marker.
    pub fn startup_sequence(&self) -> Vec<Notification> {
        let state = self.state.lock();
        let home_id = state.network.home_id;
        let mut sequence = vec![Notification::new(NotificationKind::DriverReady, home_id, 0)];
        for node in &state.network.nodes {
            let node_id = node.node_id;
            sequence.push(Notification::new(NotificationKind::NodeNew, home_id, node_id));
            sequence.push(Notification::new(NotificationKind::NodeAdded, home_id, node_id));
            for value in &node.values {
                sequence.push(
                    Notification::new(NotificationKind::ValueAdded, home_id, node_id)
                        .with_value(value.value_id(home_id, node_id)),
                );
            }
            for kind in [
                NotificationKind::NodeNaming,
                NotificationKind::EssentialNodeQueriesComplete,
                NotificationKind::NodeQueriesComplete,
            ] {
                sequence.push(Notification::new(kind, home_id, node_id));
            }
        }
        sequence.push(Notification::new(NotificationKind::AllNodesQueried, home_id, 0));
        sequence
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn record(&self, call: ManagerCall) {
        debug!(?call, "controller call");
        self.state.lock().calls.push(call);
    }

    fn node_field(&self, node_id: u8, field: impl FnOnce(&SimNode) -> String) -> String {
        self.state
            .lock()
            .network
            .node(node_id)
            .map(field)
            .unwrap_or_default()
    }

    fn value_meta<R: Default>(&self, value: &ValueId, field: impl FnOnce(&SimValue) -> R) -> R {
        self.state
            .lock()
            .network
            .value(value)
            .map(field)
            .unwrap_or_default()
    }

    /// Read a live or scene reading, coerced to the expected type.
    fn read(
        &self,
        value: &ValueId,
        scene_id: Option<u8>,
        expected: ValueType,
    ) -> Result<ValuePayload, ControllerError> {
        if value.value_type != expected {
            return Err(mismatch(value, expected));
        }
        let state = self.state.lock();
        let data = match scene_id {
            None => state
                .network
                .value(value)
                .ok_or_else(|| unknown_value(value))?
                .data
                .clone(),
            Some(scene_id) => {
                let scene = state
                    .network
                    .scene(scene_id)
                    .ok_or(ControllerError::UnknownScene { scene_id })?;
                let stored = scene
                    .values
                    .iter()
                    .find(|v| v.is(value))
                    .ok_or_else(|| unknown_value(value))?;
                Some(stored.data.clone())
            }
        };
        data.and_then(|d| d.coerce(expected))
            .ok_or_else(|| unknown_value(value))
    }
}

fn unknown_value(value: &ValueId) -> ControllerError {
    ControllerError::UnknownValue {
        value_id: value.compound_id(),
    }
}

fn mismatch(value: &ValueId, expected: ValueType) -> ControllerError {
    ControllerError::TypeMismatch {
        value_id: value.compound_id(),
        expected,
    }
}

impl Manager for MemoryController {
    // ── Lifecycle ────────────────────────────────────────────────────

    fn configure(&self, options: &ManagerOptions) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            if state.options_locked {
                return Err(ControllerError::OptionsLocked);
            }
            state.options_locked = true;
        }
        self.record(ManagerCall::Configure(options.clone()));
        Ok(())
    }

    fn add_watcher(&self, watcher: Watcher) {
        *self.watcher.lock() = Some(watcher);
    }

    fn remove_watcher(&self) {
        *self.watcher.lock() = None;
    }

    fn add_driver(&self, device: &str) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            if state.drivers.iter().any(|d| d == device) {
                return Err(ControllerError::Rejected {
                    message: format!("driver for {device} already added"),
                });
            }
            state.drivers.push(device.to_owned());
        }
        self.record(ManagerCall::AddDriver(device.to_owned()));
        Ok(())
    }

    fn remove_driver(&self, device: &str) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            let pos = state
                .drivers
                .iter()
                .position(|d| d == device)
                .ok_or_else(|| ControllerError::NoDriver {
                    device: device.to_owned(),
                })?;
            state.drivers.remove(pos);
        }
        self.record(ManagerCall::RemoveDriver(device.to_owned()));
        Ok(())
    }

    // ── Node information ─────────────────────────────────────────────

    fn node_manufacturer_name(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.manufacturer.clone())
    }

    fn node_manufacturer_id(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.manufacturer_id.clone())
    }

    fn node_product_name(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.product.clone())
    }

    fn node_product_type(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.product_type.clone())
    }

    fn node_product_id(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.product_id.clone())
    }

    fn node_type(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.node_type.clone())
    }

    fn node_name(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.name.clone())
    }

    fn node_location(&self, _home_id: u32, node_id: u8) -> String {
        self.node_field(node_id, |n| n.location.clone())
    }

    fn node_neighbors(&self, _home_id: u32, node_id: u8) -> Vec<u8> {
        self.state
            .lock()
            .network
            .node(node_id)
            .map(|n| n.neighbors.clone())
            .unwrap_or_default()
    }

    fn set_node_location(&self, _home_id: u32, node_id: u8, location: &str) {
        if let Some(node) = self.state.lock().network.node_mut(node_id) {
            node.location = location.to_owned();
        }
        self.record(ManagerCall::SetNodeLocation {
            node_id,
            location: location.to_owned(),
        });
    }

    fn set_node_name(&self, _home_id: u32, node_id: u8, name: &str) {
        if let Some(node) = self.state.lock().network.node_mut(node_id) {
            node.name = name.to_owned();
        }
        self.record(ManagerCall::SetNodeName {
            node_id,
            name: name.to_owned(),
        });
    }

    // ── Value metadata ───────────────────────────────────────────────

    fn value_label(&self, value: &ValueId) -> String {
        self.value_meta(value, |v| v.label.clone())
    }

    fn value_units(&self, value: &ValueId) -> String {
        self.value_meta(value, |v| v.units.clone())
    }

    fn is_value_read_only(&self, value: &ValueId) -> bool {
        self.value_meta(value, |v| v.read_only)
    }

    fn is_value_write_only(&self, value: &ValueId) -> bool {
        self.value_meta(value, |v| v.write_only)
    }

    fn value_min(&self, value: &ValueId) -> i32 {
        self.value_meta(value, |v| v.min)
    }

    fn value_max(&self, value: &ValueId) -> i32 {
        self.value_meta(value, |v| v.max)
    }

    // ── Value reads and writes ───────────────────────────────────────

    fn value_as_bool(&self, value: &ValueId) -> Result<bool, ControllerError> {
        match self.read(value, None, ValueType::Bool)? {
            ValuePayload::Bool(b) => Ok(b),
            _ => Err(mismatch(value, ValueType::Bool)),
        }
    }

    fn value_as_byte(&self, value: &ValueId) -> Result<u8, ControllerError> {
        match self.read(value, None, ValueType::Byte)? {
            ValuePayload::Byte(b) => Ok(b),
            _ => Err(mismatch(value, ValueType::Byte)),
        }
    }

    fn value_as_float(&self, value: &ValueId) -> Result<f32, ControllerError> {
        match self.read(value, None, ValueType::Decimal)? {
            ValuePayload::Decimal(f) => Ok(f),
            _ => Err(mismatch(value, ValueType::Decimal)),
        }
    }

    fn value_as_int(&self, value: &ValueId) -> Result<i32, ControllerError> {
        match self.read(value, None, ValueType::Int)? {
            ValuePayload::Int(i) => Ok(i),
            _ => Err(mismatch(value, ValueType::Int)),
        }
    }

    fn value_as_short(&self, value: &ValueId) -> Result<i16, ControllerError> {
        match self.read(value, None, ValueType::Short)? {
            ValuePayload::Short(s) => Ok(s),
            _ => Err(mismatch(value, ValueType::Short)),
        }
    }

    fn value_as_string(&self, value: &ValueId) -> Result<String, ControllerError> {
        match self.read(value, None, ValueType::String)? {
            ValuePayload::String(s) => Ok(s),
            _ => Err(mismatch(value, ValueType::String)),
        }
    }

    fn value_list_selection(&self, value: &ValueId) -> Result<String, ControllerError> {
        match self.read(value, None, ValueType::List)? {
            ValuePayload::String(s) => Ok(s),
            _ => Err(mismatch(value, ValueType::List)),
        }
    }

    fn value_list_items(&self, value: &ValueId) -> Result<Vec<String>, ControllerError> {
        if value.value_type != ValueType::List {
            return Err(mismatch(value, ValueType::List));
        }
        self.state
            .lock()
            .network
            .value(value)
            .map(|v| v.items.clone())
            .ok_or_else(|| unknown_value(value))
    }

    fn set_value(&self, value: &ValueId, payload: ValuePayload) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            let sim = state
                .network
                .value_mut(value)
                .ok_or_else(|| unknown_value(value))?;
            if sim.read_only {
                return Err(ControllerError::Rejected {
                    message: format!("value {} is read-only", value.compound_id()),
                });
            }
            if let (ValueType::List, ValuePayload::String(selection)) = (sim.value_type, &payload) {
                if !sim.items.contains(selection) {
                    return Err(ControllerError::Rejected {
                        message: format!("{selection:?} is not an item of {}", value.compound_id()),
                    });
                }
            }
            sim.data = Some(payload.clone().into());
        }
        self.record(ManagerCall::SetValue {
            value: *value,
            payload,
        });
        Ok(())
    }

    // ── Polling ──────────────────────────────────────────────────────

    fn enable_poll(&self, value: &ValueId) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            if state.network.value(value).is_none() {
                return Err(unknown_value(value));
            }
            state.polled.insert(*value);
        }
        self.record(ManagerCall::EnablePoll(*value));
        Ok(())
    }

    fn disable_poll(&self, value: &ValueId) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            if state.network.value(value).is_none() {
                return Err(unknown_value(value));
            }
            state.polled.remove(value);
        }
        self.record(ManagerCall::DisablePoll(*value));
        Ok(())
    }

    // ── Network ──────────────────────────────────────────────────────

    fn reset_controller(&self, _home_id: u32) {
        self.record(ManagerCall::ResetController);
    }

    fn soft_reset(&self, _home_id: u32) {
        self.record(ManagerCall::SoftReset);
    }

    fn switch_all_on(&self, _home_id: u32) {
        self.record(ManagerCall::SwitchAllOn);
    }

    fn switch_all_off(&self, _home_id: u32) {
        self.record(ManagerCall::SwitchAllOff);
    }

    fn heal_network_node(&self, _home_id: u32, node_id: u8, do_return_routes: bool) {
        self.record(ManagerCall::HealNetworkNode {
            node_id,
            do_return_routes,
        });
    }

    fn heal_network(&self, _home_id: u32, do_return_routes: bool) {
        self.record(ManagerCall::HealNetwork { do_return_routes });
    }

    fn set_config_param(
        &self,
        _home_id: u32,
        node_id: u8,
        param: u8,
        value: i32,
        size: Option<u8>,
    ) -> Result<(), ControllerError> {
        if self.state.lock().network.node(node_id).is_none() {
            return Err(ControllerError::UnknownNode { node_id });
        }
        self.record(ManagerCall::SetConfigParam {
            node_id,
            param,
            value,
            size,
        });
        Ok(())
    }

    // ── Scenes ───────────────────────────────────────────────────────

    fn num_scenes(&self) -> usize {
        self.state.lock().network.scenes.len()
    }

    fn all_scenes(&self) -> Vec<u8> {
        self.state
            .lock()
            .network
            .scenes
            .iter()
            .map(|s| s.scene_id)
            .collect()
    }

    fn create_scene(&self) -> u8 {
        let scene_id = {
            let mut state = self.state.lock();
            let next = state
                .network
                .scenes
                .iter()
                .map(|s| s.scene_id)
                .max()
                .unwrap_or(0)
                .checked_add(1);
            let Some(scene_id) = next else {
                return 0;
            };
            state.network.scenes.push(SimScene {
                scene_id,
                ..SimScene::default()
            });
            scene_id
        };
        self.record(ManagerCall::CreateScene(scene_id));
        scene_id
    }

    fn remove_scene(&self, scene_id: u8) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            let before = state.network.scenes.len();
            state.network.scenes.retain(|s| s.scene_id != scene_id);
            if state.network.scenes.len() == before {
                return Err(ControllerError::UnknownScene { scene_id });
            }
        }
        self.record(ManagerCall::RemoveScene(scene_id));
        Ok(())
    }

    fn activate_scene(&self, scene_id: u8) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            let stored = state
                .network
                .scene(scene_id)
                .ok_or(ControllerError::UnknownScene { scene_id })?
                .values
                .clone();
            for entry in stored {
                let Some(target) = state.network.resolve(
                    entry.node_id,
                    entry.command_class,
                    entry.instance,
                    entry.index,
                ) else {
                    continue;
                };
                if let Some(sim) = state.network.value_mut(&target) {
                    sim.data = Some(entry.data);
                }
            }
        }
        self.record(ManagerCall::ActivateScene(scene_id));
        Ok(())
    }

    fn scene_label(&self, scene_id: u8) -> String {
        self.state
            .lock()
            .network
            .scene(scene_id)
            .map(|s| s.label.clone())
            .unwrap_or_default()
    }

    fn set_scene_label(&self, scene_id: u8, label: &str) {
        if let Some(scene) = self.state.lock().network.scene_mut(scene_id) {
            scene.label = label.to_owned();
        }
        self.record(ManagerCall::SetSceneLabel {
            scene_id,
            label: label.to_owned(),
        });
    }

    fn scene_values(&self, scene_id: u8) -> Vec<ValueId> {
        let state = self.state.lock();
        let Some(scene) = state.network.scene(scene_id) else {
            return Vec::new();
        };
        scene
            .values
            .iter()
            .filter_map(|v| {
                state
                    .network
                    .resolve(v.node_id, v.command_class, v.instance, v.index)
            })
            .collect()
    }

    fn add_scene_value(
        &self,
        scene_id: u8,
        value: &ValueId,
        payload: ValuePayload,
    ) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            if state.network.value(value).is_none() {
                return Err(unknown_value(value));
            }
            let scene = state
                .network
                .scene_mut(scene_id)
                .ok_or(ControllerError::UnknownScene { scene_id })?;
            let data = ScalarValue::from(payload.clone());
            match scene.values.iter_mut().find(|v| v.is(value)) {
                Some(existing) => existing.data = data,
                None => scene.values.push(SimSceneValue {
                    node_id: value.node_id,
                    command_class: value.command_class,
                    instance: value.instance,
                    index: value.index,
                    data,
                }),
            }
        }
        self.record(ManagerCall::AddSceneValue {
            scene_id,
            value: *value,
            payload,
        });
        Ok(())
    }

    fn remove_scene_value(&self, scene_id: u8, value: &ValueId) -> Result<(), ControllerError> {
        {
            let mut state = self.state.lock();
            let scene = state
                .network
                .scene_mut(scene_id)
                .ok_or(ControllerError::UnknownScene { scene_id })?;
            let before = scene.values.len();
            scene.values.retain(|v| !v.is(value));
            if scene.values.len() == before {
                return Err(unknown_value(value));
            }
        }
        self.record(ManagerCall::RemoveSceneValue {
            scene_id,
            value: *value,
        });
        Ok(())
    }

    fn scene_value_as_bool(&self, scene_id: u8, value: &ValueId) -> Result<bool, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::Bool)? {
            ValuePayload::Bool(b) => Ok(b),
            _ => Err(mismatch(value, ValueType::Bool)),
        }
    }

    fn scene_value_as_byte(&self, scene_id: u8, value: &ValueId) -> Result<u8, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::Byte)? {
            ValuePayload::Byte(b) => Ok(b),
            _ => Err(mismatch(value, ValueType::Byte)),
        }
    }

    fn scene_value_as_float(&self, scene_id: u8, value: &ValueId) -> Result<f32, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::Decimal)? {
            ValuePayload::Decimal(f) => Ok(f),
            _ => Err(mismatch(value, ValueType::Decimal)),
        }
    }

    fn scene_value_as_int(&self, scene_id: u8, value: &ValueId) -> Result<i32, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::Int)? {
            ValuePayload::Int(i) => Ok(i),
            _ => Err(mismatch(value, ValueType::Int)),
        }
    }

    fn scene_value_as_short(&self, scene_id: u8, value: &ValueId) -> Result<i16, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::Short)? {
            ValuePayload::Short(s) => Ok(s),
            _ => Err(mismatch(value, ValueType::Short)),
        }
    }

    fn scene_value_as_string(
        &self,
        scene_id: u8,
        value: &ValueId,
    ) -> Result<String, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::String)? {
            ValuePayload::String(s) => Ok(s),
            _ => Err(mismatch(value, ValueType::String)),
        }
    }

    fn scene_value_list_selection(
        &self,
        scene_id: u8,
        value: &ValueId,
    ) -> Result<String, ControllerError> {
        match self.read(value, Some(scene_id), ValueType::List)? {
            ValuePayload::String(s) => Ok(s),
            _ => Err(mismatch(value, ValueType::List)),
        }
    }
}
