use super::Floor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotovoltaicSystem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "isCopied", default, skip_serializing_if = "Option::is_none")]
    pub is_copied: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PhotovoltaicSystem {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_copied: None,
            extra: Map::new(),
        }
    }
}

/// One version of the building: its floor tree and renewable systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    #[serde(default)]
    pub shape_info: Vec<Floor>,
    #[serde(default)]
    pub photovoltaic_systems: Vec<PhotovoltaicSystem>,
}

impl Building {
    #[must_use]
    pub fn new(shape_info: Vec<Floor>) -> Self {
        Self {
            shape_info,
            photovoltaic_systems: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    Before,
    After,
}

impl Version {
    pub const ALL: [Self; 2] = [Self::Before, Self::After];
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// The persisted unit: the building before and after a remodel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub before: Building,
    #[serde(default)]
    pub after: Building,
}

impl Document {
    #[must_use]
    pub fn building(&self, version: Version) -> &Building {
        match version {
            Version::Before => &self.before,
            Version::After => &self.after,
        }
    }

    pub fn building_mut(&mut self, version: Version) -> &mut Building {
        match version {
            Version::Before => &mut self.before,
            Version::After => &mut self.after,
        }
    }

    /// Returns a copy with the floors of `version` replaced wholesale.
    #[must_use]
    pub fn with_floors(&self, version: Version, floors: Vec<Floor>) -> Self {
        let mut next = self.clone();
        next.building_mut(version).shape_info = floors;
        next
    }
}
