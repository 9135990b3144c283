// ── Node and scene registries ──
//
// Domain operations over the two collections. Every method takes the
// collection lock for one short mutation or lookup and returns owned
// data or `Arc` handles, so no lock is ever held across a controller
// or host call.

use std::sync::Arc;

use tokio::sync::watch;

use super::collection::Collection;
use crate::model::{NodeRecord, SceneInfo, SceneSummary, ValueId};

/// Bridge-side mirror of the controller's nodes and scenes.
pub struct Registry {
    nodes: Collection<u8, NodeRecord>,
    scenes: Collection<u8, SceneInfo>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            nodes: Collection::new(),
            scenes: Collection::new(),
        }
    }

    // ── Nodes ────────────────────────────────────────────────────────

    /// Register a node. Returns `false` if it was already known.
    pub fn add_node(&self, home_id: u32, node_id: u8) -> bool {
        self.nodes
            .insert_new(node_id, NodeRecord::new(home_id, node_id))
    }

    pub fn node(&self, node_id: u8) -> Option<Arc<NodeRecord>> {
        self.nodes.get(node_id)
    }

    pub fn has_node(&self, node_id: u8) -> bool {
        self.nodes.contains(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> Arc<Vec<Arc<NodeRecord>>> {
        self.nodes.snapshot()
    }

    pub fn subscribe_nodes(&self) -> watch::Receiver<Arc<Vec<Arc<NodeRecord>>>> {
        self.nodes.subscribe()
    }

    /// Attach a value to its node. `None` if the node is unknown,
    /// `Some(false)` if the value was already attached.
    pub fn attach_value(&self, node_id: u8, value: ValueId) -> Option<bool> {
        self.nodes.update(node_id, |node| node.attach(value))
    }

    /// Detach a value from its node. `None` if the node is unknown.
    pub fn detach_value(&self, node_id: u8, value: &ValueId) -> Option<bool> {
        self.nodes.update(node_id, |node| node.detach(value))
    }

    pub fn find_value(
        &self,
        node_id: u8,
        command_class: u8,
        instance: u8,
        index: u8,
    ) -> Option<ValueId> {
        self.nodes
            .get(node_id)?
            .find_value(command_class, instance, index)
    }

    pub fn first_value_of_class(&self, node_id: u8, command_class: u8) -> Option<ValueId> {
        self.nodes.get(node_id)?.first_of_class(command_class)
    }

    pub fn set_polling(&self, node_id: u8, enabled: bool) {
        self.nodes
            .update(node_id, |node| node.polling_enabled = enabled);
    }

    // ── Scenes ───────────────────────────────────────────────────────

    pub fn insert_scene(&self, scene: SceneInfo) -> bool {
        self.scenes.insert_new(scene.scene_id, scene)
    }

    pub fn remove_scene(&self, scene_id: u8) -> Option<Arc<SceneInfo>> {
        self.scenes.remove(scene_id)
    }

    pub fn scene(&self, scene_id: u8) -> Option<Arc<SceneInfo>> {
        self.scenes.get(scene_id)
    }

    pub fn has_scene(&self, scene_id: u8) -> bool {
        self.scenes.contains(scene_id)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scenes(&self) -> Arc<Vec<Arc<SceneInfo>>> {
        self.scenes.snapshot()
    }

    pub fn scene_summaries(&self) -> Vec<SceneSummary> {
        self.scenes.snapshot().iter().map(|s| s.summary()).collect()
    }

    /// Rebuild the scene cache from a fresh controller listing.
    pub fn replace_scenes(&self, scenes: Vec<SceneInfo>) {
        self.scenes
            .replace_all(scenes.into_iter().map(|s| (s.scene_id, s)));
    }

    /// Replace the cached value list of a scene. Returns `false` if unknown.
    pub fn set_scene_values(&self, scene_id: u8, values: Vec<ValueId>) -> bool {
        self.scenes
            .update(scene_id, |scene| scene.values = values)
            .is_some()
    }

    /// First cached scene value at the given node and address.
    pub fn scene_value(
        &self,
        scene_id: u8,
        node_id: u8,
        command_class: u8,
        instance: u8,
        index: u8,
    ) -> Option<ValueId> {
        self.scenes
            .get(scene_id)?
            .values
            .iter()
            .find(|v| v.node_id == node_id && v.matches(command_class, instance, index))
            .copied()
    }

    pub fn attach_scene_value(&self, scene_id: u8, value: ValueId) -> bool {
        self.scenes
            .update(scene_id, |scene| {
                if !scene.values.contains(&value) {
                    scene.values.push(value);
                }
            })
            .is_some()
    }

    pub fn detach_scene_value(&self, scene_id: u8, value: &ValueId) -> bool {
        self.scenes
            .update(scene_id, |scene| scene.values.retain(|v| v != value))
            .is_some()
    }

    /// Drop every node and scene.
    pub fn clear(&self) {
        self.nodes.clear();
        self.scenes.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ValueGenre, ValueType};

    fn value(node_id: u8, class: u8) -> ValueId {
        ValueId {
            home_id: 9,
            node_id,
            genre: ValueGenre::User,
            command_class: class,
            instance: 1,
            index: 0,
            value_type: ValueType::Bool,
        }
    }

    #[test]
    fn one_record_per_node_id() {
        let reg = Registry::new();
        assert!(reg.add_node(9, 4));
        reg.attach_value(4, value(4, 37));
        assert!(!reg.add_node(9, 4));
        assert_eq!(reg.node_count(), 1);
        assert_eq!(reg.node(4).unwrap().values, vec![value(4, 37)]);
    }

    #[test]
    fn attach_to_unknown_node_is_reported() {
        let reg = Registry::new();
        assert_eq!(reg.attach_value(8, value(8, 37)), None);
        assert_eq!(reg.detach_value(8, &value(8, 37)), None);
    }

    #[test]
    fn value_lookups_go_through_the_node() {
        let reg = Registry::new();
        reg.add_node(9, 4);
        reg.attach_value(4, value(4, 37));
        assert_eq!(reg.find_value(4, 37, 1, 0), Some(value(4, 37)));
        assert_eq!(reg.first_value_of_class(4, 37), Some(value(4, 37)));
        assert_eq!(reg.find_value(5, 37, 1, 0), None);
    }

    #[test]
    fn scenes_rebuild_and_lookup() {
        let reg = Registry::new();
        reg.replace_scenes(vec![SceneInfo::new(1, "Morning"), SceneInfo::new(2, "Night")]);
        assert_eq!(reg.scene_count(), 2);
        assert_eq!(
            reg.scene_summaries()
                .iter()
                .map(|s| s.label.as_str())
                .collect::<Vec<_>>(),
            vec!["Morning", "Night"]
        );

        assert!(reg.set_scene_values(2, vec![value(4, 37), value(5, 37)]));
        assert_eq!(reg.scene_value(2, 5, 37, 1, 0), Some(value(5, 37)));
        assert!(reg.detach_scene_value(2, &value(5, 37)));
        assert_eq!(reg.scene_value(2, 5, 37, 1, 0), None);
        assert!(!reg.set_scene_values(3, Vec::new()));
    }

    #[test]
    fn clear_empties_both_tables() {
        let reg = Registry::new();
        reg.add_node(9, 1);
        reg.insert_scene(SceneInfo::new(1, "All"));
        reg.clear();
        assert_eq!(reg.node_count(), 0);
        assert_eq!(reg.scene_count(), 0);
    }
}
