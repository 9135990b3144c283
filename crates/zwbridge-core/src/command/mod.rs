// ── Command API ──
//
// Every host-originated operation flows through the `Command` enum.
// The bridge routes each variant to a single controller call after
// resolving node, value and scene handles from its registries. A
// handle that cannot be resolved is a lookup miss: the command is
// dropped and reported as `CommandResult::Ignored`.

pub(crate) mod route;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::model::ScalarValue;

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, BridgeError>>,
}

/// All operations a host can ask of the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    // ── Values ───────────────────────────────────────────────────────
    SetValue {
        node_id: u8,
        class_id: u8,
        instance: u8,
        index: u8,
        value: ScalarValue,
    },
    EnablePoll {
        node_id: u8,
        class_id: u8,
    },
    DisablePoll {
        node_id: u8,
        class_id: u8,
    },

    // ── Nodes ────────────────────────────────────────────────────────
    SetLocation {
        node_id: u8,
        location: String,
    },
    SetName {
        node_id: u8,
        name: String,
    },
    GetNodeNeighbors {
        node_id: u8,
    },
    SetConfigParam {
        /// Overrides the home id learned from `driver ready`.
        #[serde(default)]
        home_id: Option<u32>,
        node_id: u8,
        param: u8,
        value: i32,
        #[serde(default)]
        size: Option<u8>,
    },

    // ── Network ──────────────────────────────────────────────────────
    HardReset,
    SoftReset,
    SwitchAllOn,
    SwitchAllOff,
    HealNetworkNode {
        node_id: u8,
        #[serde(default)]
        return_routes: bool,
    },
    HealNetwork,

    // ── Scenes ───────────────────────────────────────────────────────
    CreateScene {
        label: String,
    },
    RemoveScene {
        scene_id: u8,
    },
    GetScenes,
    SceneGetValues {
        scene_id: u8,
    },
    AddSceneValue {
        scene_id: u8,
        node_id: u8,
        class_id: u8,
        instance: u8,
        index: u8,
        value: ScalarValue,
    },
    RemoveSceneValue {
        scene_id: u8,
        node_id: u8,
        class_id: u8,
        instance: u8,
        index: u8,
    },
    ActivateScene {
        scene_id: u8,
    },
}

impl Command {
    /// Short kebab-case name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetValue { .. } => "set-value",
            Self::EnablePoll { .. } => "enable-poll",
            Self::DisablePoll { .. } => "disable-poll",
            Self::SetLocation { .. } => "set-location",
            Self::SetName { .. } => "set-name",
            Self::GetNodeNeighbors { .. } => "get-node-neighbors",
            Self::SetConfigParam { .. } => "set-config-param",
            Self::HardReset => "hard-reset",
            Self::SoftReset => "soft-reset",
            Self::SwitchAllOn => "switch-all-on",
            Self::SwitchAllOff => "switch-all-off",
            Self::HealNetworkNode { .. } => "heal-network-node",
            Self::HealNetwork => "heal-network",
            Self::CreateScene { .. } => "create-scene",
            Self::RemoveScene { .. } => "remove-scene",
            Self::GetScenes => "get-scenes",
            Self::SceneGetValues { .. } => "scene-get-values",
            Self::AddSceneValue { .. } => "add-scene-value",
            Self::RemoveSceneValue { .. } => "remove-scene-value",
            Self::ActivateScene { .. } => "activate-scene",
        }
    }
}

/// Outcome of a successfully routed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// The controller was called.
    Applied,
    /// A node, value or scene was not found; nothing was done.
    Ignored,
}
