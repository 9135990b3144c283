use serde::{Deserialize, Serialize};

use super::value_id::ValueId;

/// Bridge-side record for one node, keyed by `node_id` in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub home_id: u32,
    pub node_id: u8,
    pub polling_enabled: bool,
    /// Values in the order the controller announced them.
    pub values: Vec<ValueId>,
}

impl NodeRecord {
    pub fn new(home_id: u32, node_id: u8) -> Self {
        Self {
            home_id,
            node_id,
            polling_enabled: false,
            values: Vec::new(),
        }
    }

    /// First value at the given address, in announcement order.
    pub fn find_value(&self, command_class: u8, instance: u8, index: u8) -> Option<ValueId> {
        self.values
            .iter()
            .find(|v| v.matches(command_class, instance, index))
            .copied()
    }

    /// First value of the given command class.
    pub fn first_of_class(&self, command_class: u8) -> Option<ValueId> {
        self.values
            .iter()
            .find(|v| v.command_class == command_class)
            .copied()
    }

    /// Append a value unless it is already attached. Returns `true` if added.
    pub fn attach(&mut self, value: ValueId) -> bool {
        if self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Detach a value. Returns `true` if it was present.
    pub fn detach(&mut self, value: &ValueId) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(pos) => {
                self.values.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Descriptive node information, re-read from the controller on demand.
///
/// Unknown fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub manufacturer: String,
    pub manufacturerid: String,
    pub product: String,
    pub producttype: String,
    pub productid: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    pub loc: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ValueGenre, ValueType};

    fn value(class: u8, index: u8) -> ValueId {
        ValueId {
            home_id: 1,
            node_id: 4,
            genre: ValueGenre::User,
            command_class: class,
            instance: 1,
            index,
            value_type: ValueType::Byte,
        }
    }

    #[test]
    fn attach_is_idempotent_and_preserves_order() {
        let mut node = NodeRecord::new(1, 4);
        assert!(node.attach(value(38, 0)));
        assert!(node.attach(value(37, 0)));
        assert!(!node.attach(value(38, 0)));
        assert_eq!(node.values, vec![value(38, 0), value(37, 0)]);
    }

    #[test]
    fn detach_twice_is_a_no_op() {
        let mut node = NodeRecord::new(1, 4);
        node.attach(value(38, 0));
        assert!(node.detach(&value(38, 0)));
        assert!(!node.detach(&value(38, 0)));
        assert!(node.values.is_empty());
    }

    #[test]
    fn lookups_return_first_match() {
        let mut node = NodeRecord::new(1, 4);
        node.attach(value(112, 3));
        node.attach(value(112, 5));
        assert_eq!(node.first_of_class(112), Some(value(112, 3)));
        assert_eq!(node.find_value(112, 1, 5), Some(value(112, 5)));
        assert_eq!(node.find_value(112, 2, 5), None);
    }

    #[test]
    fn node_info_serializes_with_host_field_names() {
        let info = NodeInfo {
            node_type: "Binary Switch".into(),
            loc: "Kitchen".into(),
            ..NodeInfo::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "Binary Switch");
        assert_eq!(json["loc"], "Kitchen");
        assert_eq!(json["manufacturerid"], "");
    }
}
