// ── Notification records ──
//
// The producer thread converts each controller callback into an owned
// `Notification` before it crosses into the queue. Only the fields the
// kind defines are read; everything else stays `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value_id::ValueId;
use crate::manager::RawNotification;

/// Every notification kind the controller can deliver.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NotificationKind {
    // ── Values ───────────────────────────────────────────────────────
    ValueAdded,
    ValueRemoved,
    ValueChanged,
    ValueRefreshed,

    // ── Nodes ────────────────────────────────────────────────────────
    Group,
    NodeNew,
    NodeAdded,
    NodeRemoved,
    NodeProtocolInfo,
    NodeNaming,
    NodeEvent,
    PollingDisabled,
    PollingEnabled,
    EssentialNodeQueriesComplete,
    NodeQueriesComplete,

    // ── Scenes and buttons ───────────────────────────────────────────
    SceneEvent,
    CreateButton,
    DeleteButton,
    ButtonOn,
    ButtonOff,

    // ── Driver and network ───────────────────────────────────────────
    DriverReady,
    DriverFailed,
    DriverReset,
    DriverRemoved,
    AwakeNodesQueried,
    AllNodesQueriedSomeDead,
    AllNodesQueried,
    ControllerCommand,

    // ── Diagnostics ──────────────────────────────────────────────────
    Notification,
}

impl NotificationKind {
    /// Kinds that carry a value reference.
    pub fn carries_value(self) -> bool {
        matches!(
            self,
            Self::ValueAdded | Self::ValueRemoved | Self::ValueChanged | Self::ValueRefreshed
        )
    }

    fn carries_button(self) -> bool {
        matches!(
            self,
            Self::CreateButton | Self::DeleteButton | Self::ButtonOn | Self::ButtonOff
        )
    }
}

/// Owned snapshot of one controller notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    #[serde(default)]
    pub home_id: u32,
    #[serde(default)]
    pub node_id: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u8>,
}

impl Notification {
    pub fn new(kind: NotificationKind, home_id: u32, node_id: u8) -> Self {
        Self {
            kind,
            home_id,
            node_id,
            value: None,
            group_index: None,
            event: None,
            button_id: None,
            scene_id: None,
            code: None,
        }
    }

    /// Copy the fields that are valid for the notification's kind.
    ///
    /// Runs on the controller's thread; must not touch bridge state.
    pub fn capture(raw: &dyn RawNotification) -> Self {
        let kind = raw.kind();
        let mut captured = Self::new(kind, raw.home_id(), raw.node_id());
        if kind.carries_value() {
            captured.value = raw.value_id();
        }
        match kind {
            NotificationKind::Group => captured.group_index = Some(raw.group_index()),
            NotificationKind::NodeEvent => captured.event = Some(raw.event()),
            NotificationKind::SceneEvent => captured.scene_id = Some(raw.scene_id()),
            NotificationKind::Notification => captured.code = Some(raw.notification_code()),
            k if k.carries_button() => captured.button_id = Some(raw.button_id()),
            _ => {}
        }
        captured
    }

    pub fn with_value(mut self, value: ValueId) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_event(mut self, event: u8) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_scene(mut self, scene_id: u8) -> Self {
        self.scene_id = Some(scene_id);
        self
    }

    pub fn with_code(mut self, code: u8) -> Self {
        self.code = Some(code);
        self
    }
}

/// Owned notifications replay through the same capture path as live ones.
impl RawNotification for Notification {
    fn kind(&self) -> NotificationKind {
        self.kind
    }

    fn home_id(&self) -> u32 {
        self.home_id
    }

    fn node_id(&self) -> u8 {
        self.node_id
    }

    fn value_id(&self) -> Option<ValueId> {
        self.value
    }

    fn group_index(&self) -> u8 {
        self.group_index.unwrap_or_default()
    }

    fn event(&self) -> u8 {
        self.event.unwrap_or_default()
    }

    fn button_id(&self) -> u8 {
        self.button_id.unwrap_or_default()
    }

    fn scene_id(&self) -> u8 {
        self.scene_id.unwrap_or_default()
    }

    fn notification_code(&self) -> u8 {
        self.code.unwrap_or_default()
    }
}

// ── Diagnostic codes ─────────────────────────────────────────────────

/// Subtype of a diagnostic [`NotificationKind::Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    MessageComplete,
    Timeout,
    NoOperation,
    Awake,
    Sleep,
    Dead,
    Alive,
    Other(u8),
}

impl From<u8> for DiagnosticCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::MessageComplete,
            1 => Self::Timeout,
            2 => Self::NoOperation,
            3 => Self::Awake,
            4 => Self::Sleep,
            5 => Self::Dead,
            6 => Self::Alive,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageComplete => f.write_str("message complete"),
            Self::Timeout => f.write_str("timeout"),
            Self::NoOperation => f.write_str("no operation"),
            Self::Awake => f.write_str("node awake"),
            Self::Sleep => f.write_str("node asleep"),
            Self::Dead => f.write_str("node dead"),
            Self::Alive => f.write_str("node alive"),
            Self::Other(code) => write!(f, "unknown notification code {code}"),
        }
    }
}
