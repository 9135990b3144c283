use serde::Serialize;

use super::value_id::ValueId;

/// Locally cached scene, keyed by `scene_id` in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneInfo {
    pub scene_id: u8,
    pub label: String,
    pub values: Vec<ValueId>,
}

impl SceneInfo {
    pub fn new(scene_id: u8, label: impl Into<String>) -> Self {
        Self {
            scene_id,
            label: label.into(),
            values: Vec::new(),
        }
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            sceneid: self.scene_id,
            label: self.label.clone(),
        }
    }
}

/// Entry of the `scenes list` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub sceneid: u8,
    pub label: String,
}
