// ── Controller abstraction ──
//
// `Manager` is the seam between the bridge and the Z-Wave controller
// library. The library runs its own worker threads and calls the
// registered `Watcher` from them; every other method is called from
// the bridge's loop thread.
//
// Getters for descriptive strings return an empty string when the
// controller has nothing to report. Value reads return a
// `ControllerError` when the value is unknown or of another type.

use std::sync::Arc;

use crate::config::ManagerOptions;
use crate::error::ControllerError;
use crate::model::{NotificationKind, ValueId, ValuePayload};

/// A notification as the controller delivers it, borrowed for the
/// duration of the callback.
///
/// Kind-specific getters are only meaningful for their kinds; callers
/// must check [`kind`](Self::kind) first.
pub trait RawNotification {
    fn kind(&self) -> NotificationKind;
    fn home_id(&self) -> u32;
    fn node_id(&self) -> u8;
    fn value_id(&self) -> Option<ValueId>;
    fn group_index(&self) -> u8;
    fn event(&self) -> u8;
    fn button_id(&self) -> u8;
    fn scene_id(&self) -> u8;
    fn notification_code(&self) -> u8;
}

/// Callback invoked on a controller-owned thread for every notification.
pub type Watcher = Arc<dyn Fn(&dyn RawNotification) + Send + Sync>;

/// Operations the bridge needs from the controller library.
pub trait Manager: Send + Sync {
    // ── Lifecycle ────────────────────────────────────────────────────

    /// Apply options. May only succeed once per manager.
    fn configure(&self, options: &ManagerOptions) -> Result<(), ControllerError>;
    fn add_watcher(&self, watcher: Watcher);
    fn remove_watcher(&self);
    fn add_driver(&self, device: &str) -> Result<(), ControllerError>;
    fn remove_driver(&self, device: &str) -> Result<(), ControllerError>;

    // ── Node information ─────────────────────────────────────────────

    fn node_manufacturer_name(&self, home_id: u32, node_id: u8) -> String;
    fn node_manufacturer_id(&self, home_id: u32, node_id: u8) -> String;
    fn node_product_name(&self, home_id: u32, node_id: u8) -> String;
    fn node_product_type(&self, home_id: u32, node_id: u8) -> String;
    fn node_product_id(&self, home_id: u32, node_id: u8) -> String;
    fn node_type(&self, home_id: u32, node_id: u8) -> String;
    fn node_name(&self, home_id: u32, node_id: u8) -> String;
    fn node_location(&self, home_id: u32, node_id: u8) -> String;
    fn node_neighbors(&self, home_id: u32, node_id: u8) -> Vec<u8>;

    fn set_node_location(&self, home_id: u32, node_id: u8, location: &str);
    fn set_node_name(&self, home_id: u32, node_id: u8, name: &str);

    // ── Value metadata ───────────────────────────────────────────────

    fn value_label(&self, value: &ValueId) -> String;
    fn value_units(&self, value: &ValueId) -> String;
    fn is_value_read_only(&self, value: &ValueId) -> bool;
    fn is_value_write_only(&self, value: &ValueId) -> bool;
    fn value_min(&self, value: &ValueId) -> i32;
    fn value_max(&self, value: &ValueId) -> i32;

    // ── Value reads and writes ───────────────────────────────────────

    fn value_as_bool(&self, value: &ValueId) -> Result<bool, ControllerError>;
    fn value_as_byte(&self, value: &ValueId) -> Result<u8, ControllerError>;
    fn value_as_float(&self, value: &ValueId) -> Result<f32, ControllerError>;
    fn value_as_int(&self, value: &ValueId) -> Result<i32, ControllerError>;
    fn value_as_short(&self, value: &ValueId) -> Result<i16, ControllerError>;
    fn value_as_string(&self, value: &ValueId) -> Result<String, ControllerError>;
    fn value_list_selection(&self, value: &ValueId) -> Result<String, ControllerError>;
    fn value_list_items(&self, value: &ValueId) -> Result<Vec<String>, ControllerError>;

    /// Write a typed value. The payload variant matches the value's type.
    fn set_value(&self, value: &ValueId, payload: ValuePayload) -> Result<(), ControllerError>;

    // ── Polling ──────────────────────────────────────────────────────

    fn enable_poll(&self, value: &ValueId) -> Result<(), ControllerError>;
    fn disable_poll(&self, value: &ValueId) -> Result<(), ControllerError>;

    // ── Network ──────────────────────────────────────────────────────

    fn reset_controller(&self, home_id: u32);
    fn soft_reset(&self, home_id: u32);
    fn switch_all_on(&self, home_id: u32);
    fn switch_all_off(&self, home_id: u32);
    fn heal_network_node(&self, home_id: u32, node_id: u8, do_return_routes: bool);
    fn heal_network(&self, home_id: u32, do_return_routes: bool);
    fn set_config_param(
        &self,
        home_id: u32,
        node_id: u8,
        param: u8,
        value: i32,
        size: Option<u8>,
    ) -> Result<(), ControllerError>;

    // ── Scenes ───────────────────────────────────────────────────────

    fn num_scenes(&self) -> usize;
    fn all_scenes(&self) -> Vec<u8>;
    /// Returns the new scene id, or 0 when the controller refused.
    fn create_scene(&self) -> u8;
    fn remove_scene(&self, scene_id: u8) -> Result<(), ControllerError>;
    fn activate_scene(&self, scene_id: u8) -> Result<(), ControllerError>;
    fn scene_label(&self, scene_id: u8) -> String;
    fn set_scene_label(&self, scene_id: u8, label: &str);
    fn scene_values(&self, scene_id: u8) -> Vec<ValueId>;
    fn add_scene_value(
        &self,
        scene_id: u8,
        value: &ValueId,
        payload: ValuePayload,
    ) -> Result<(), ControllerError>;
    fn remove_scene_value(&self, scene_id: u8, value: &ValueId) -> Result<(), ControllerError>;

    fn scene_value_as_bool(&self, scene_id: u8, value: &ValueId) -> Result<bool, ControllerError>;
    fn scene_value_as_byte(&self, scene_id: u8, value: &ValueId) -> Result<u8, ControllerError>;
    fn scene_value_as_float(&self, scene_id: u8, value: &ValueId) -> Result<f32, ControllerError>;
    fn scene_value_as_int(&self, scene_id: u8, value: &ValueId) -> Result<i32, ControllerError>;
    fn scene_value_as_short(&self, scene_id: u8, value: &ValueId) -> Result<i16, ControllerError>;
    fn scene_value_as_string(
        &self,
        scene_id: u8,
        value: &ValueId,
    ) -> Result<String, ControllerError>;
    fn scene_value_list_selection(
        &self,
        scene_id: u8,
        value: &ValueId,
    ) -> Result<String, ControllerError>;
}
