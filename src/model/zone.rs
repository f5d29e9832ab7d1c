use super::{Surface, SurfaceType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightningRef {
    pub id: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_system_cooling_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_system_heating_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation_system_id: Option<String>,
    #[serde(default)]
    pub lightning: Vec<LightningRef>,
    #[serde(rename = "isCopied", default, skip_serializing_if = "Option::is_none")]
    pub is_copied: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Zone {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            surfaces: Vec::new(),
            supply_system_cooling_id: None,
            supply_system_heating_id: None,
            ventilation_system_id: None,
            lightning: Vec::new(),
            is_copied: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_surfaces(mut self, surfaces: Vec<Surface>) -> Self {
        self.surfaces = surfaces;
        self
    }

    #[must_use]
    pub fn count_of(&self, surface_type: SurfaceType) -> usize {
        self.surfaces
            .iter()
            .filter(|s| s.surface_type == surface_type)
            .count()
    }
}
