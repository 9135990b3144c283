//! Scenario files for `zwbridge replay`.
//!
//! A scenario describes a network for the in-memory controller, the
//! notification steps its worker thread fires, and host commands to
//! run once those steps have been processed.

use std::path::Path;

use serde::Deserialize;

use zwbridge_core::sim::{MemoryController, SimNetwork};
use zwbridge_core::{Command, ControllerError, Notification, NotificationKind, ScalarValue};

use crate::error::CliError;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub network: SimNetwork,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// One thing the controller does on its own thread.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum ScenarioStep {
    /// Fire a notification as written. A zero `home_id` is filled in
    /// from the network.
    Notify(Notification),
    /// The controller's start-up sequence for the whole network.
    Startup,
    /// A device report: change a live reading, then fire `value-changed`.
    Update {
        node_id: u8,
        command_class: u8,
        #[serde(default = "default_instance")]
        instance: u8,
        #[serde(default)]
        index: u8,
        data: ScalarValue,
    },
}

fn default_instance() -> u8 {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| CliError::Scenario {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl ScenarioStep {
    /// Run this step against the controller, delivering notifications
    /// through its watcher on the calling thread.
    pub fn fire(&self, controller: &MemoryController) -> Result<(), ControllerError> {
        match self {
            Self::Notify(notification) => {
                let mut notification = notification.clone();
                if notification.home_id == 0 {
                    notification.home_id = controller.home_id();
                }
                controller.fire(&notification);
            }
            Self::Startup => {
                for notification in controller.startup_sequence() {
                    controller.fire(&notification);
                }
            }
            Self::Update {
                node_id,
                command_class,
                instance,
                index,
                data,
            } => {
                let value = controller
                    .value_id(*node_id, *command_class, *instance, *index)
                    .ok_or_else(|| ControllerError::UnknownValue {
                        value_id: format!("{node_id}-{command_class}-{instance}-{index}"),
                    })?;
                controller.update_value(&value, data.clone())?;
                controller.fire(
                    &Notification::new(NotificationKind::ValueChanged, controller.home_id(), *node_id)
                        .with_value(value),
                );
            }
        }
        Ok(())
    }
}
