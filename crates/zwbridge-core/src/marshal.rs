// ── Value and node marshalling ──
//
// Builds host-facing records from controller handles. Structural
// fields come from the `ValueId` and metadata getters; the reading
// itself comes either from the live value or from a scene's stored
// value. A failed reading leaves `value` absent but never drops the
// record.

use tracing::warn;

use crate::error::ControllerError;
use crate::manager::Manager;
use crate::model::{NodeInfo, NormalizedValue, ValueId, ValuePayload, ValueType};

/// Where a reading comes from.
#[derive(Debug, Clone, Copy)]
enum Source {
    Live,
    Scene(u8),
}

/// Render a value with its current live reading.
pub fn render_value(manager: &dyn Manager, value: &ValueId) -> NormalizedValue {
    render(manager, value, Source::Live)
}

/// Render a value with the reading stored in a scene.
///
/// List candidates are still the value's live item list.
pub fn render_scene_value(manager: &dyn Manager, scene_id: u8, value: &ValueId) -> NormalizedValue {
    render(manager, value, Source::Scene(scene_id))
}

/// Re-read a node's descriptive fields from the controller.
pub fn node_info(manager: &dyn Manager, home_id: u32, node_id: u8) -> NodeInfo {
    NodeInfo {
        manufacturer: manager.node_manufacturer_name(home_id, node_id),
        manufacturerid: manager.node_manufacturer_id(home_id, node_id),
        product: manager.node_product_name(home_id, node_id),
        producttype: manager.node_product_type(home_id, node_id),
        productid: manager.node_product_id(home_id, node_id),
        node_type: manager.node_type(home_id, node_id),
        name: manager.node_name(home_id, node_id),
        loc: manager.node_location(home_id, node_id),
    }
}

fn render(manager: &dyn Manager, value: &ValueId, source: Source) -> NormalizedValue {
    let mut record = NormalizedValue {
        value_id: value.compound_id(),
        id: value.id(),
        node_id: value.node_id,
        class_id: value.command_class,
        value_type: value.value_type,
        genre: value.genre,
        instance: value.instance,
        index: value.index,
        label: manager.value_label(value),
        units: manager.value_units(value),
        read_only: manager.is_value_read_only(value),
        write_only: manager.is_value_write_only(value),
        min: manager.value_min(value),
        max: manager.value_max(value),
        values: None,
        value: None,
    };

    if value.value_type == ValueType::List {
        match manager.value_list_items(value) {
            Ok(items) => record.values = Some(items),
            Err(error) => warn!(value_id = %value, %error, "failed to read list items"),
        }
    }

    match read(manager, value, source) {
        Ok(reading) => record.value = reading,
        Err(error) => warn!(value_id = %value, ?source, %error, "failed to read value"),
    }

    record
}

fn read(
    manager: &dyn Manager,
    value: &ValueId,
    source: Source,
) -> Result<Option<ValuePayload>, ControllerError> {
    let payload = match (value.value_type, source) {
        (ValueType::Bool, Source::Live) => ValuePayload::Bool(manager.value_as_bool(value)?),
        (ValueType::Bool, Source::Scene(s)) => {
            ValuePayload::Bool(manager.scene_value_as_bool(s, value)?)
        }
        (ValueType::Byte, Source::Live) => ValuePayload::Byte(manager.value_as_byte(value)?),
        (ValueType::Byte, Source::Scene(s)) => {
            ValuePayload::Byte(manager.scene_value_as_byte(s, value)?)
        }
        (ValueType::Decimal, Source::Live) => {
            ValuePayload::Decimal(manager.value_as_float(value)?)
        }
        (ValueType::Decimal, Source::Scene(s)) => {
            ValuePayload::Decimal(manager.scene_value_as_float(s, value)?)
        }
        (ValueType::Int, Source::Live) => ValuePayload::Int(manager.value_as_int(value)?),
        (ValueType::Int, Source::Scene(s)) => {
            ValuePayload::Int(manager.scene_value_as_int(s, value)?)
        }
        (ValueType::Short, Source::Live) => ValuePayload::Short(manager.value_as_short(value)?),
        (ValueType::Short, Source::Scene(s)) => {
            ValuePayload::Short(manager.scene_value_as_short(s, value)?)
        }
        (ValueType::String, Source::Live) => {
            ValuePayload::String(manager.value_as_string(value)?)
        }
        (ValueType::String, Source::Scene(s)) => {
            ValuePayload::String(manager.scene_value_as_string(s, value)?)
        }
        (ValueType::List, Source::Live) => {
            ValuePayload::String(manager.value_list_selection(value)?)
        }
        (ValueType::List, Source::Scene(s)) => {
            ValuePayload::String(manager.scene_value_list_selection(s, value)?)
        }
        (ValueType::Button | ValueType::Schedule | ValueType::Raw, _) => return Ok(None),
        (ValueType::Unknown(tag), _) => {
            warn!(value_id = %value, "unsupported value type: {tag:#x}");
            return Ok(None);
        }
    };
    Ok(Some(payload))
}
