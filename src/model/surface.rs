use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    Floor,
    Ceiling,
    Wall,
}

impl SurfaceType {
    /// Label used in generated surface names ("바닥 1", "벽 3").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Floor => "바닥",
            Self::Ceiling => "천장",
            Self::Wall => "벽",
        }
    }

    /// Surfaces inside a zone are kept ordered floor, ceiling, wall.
    #[must_use]
    pub const fn sort_order(self) -> u8 {
        match self {
            Self::Floor => 0,
            Self::Ceiling => 1,
            Self::Wall => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    Outdoors,
    Ground,
    Zone,
    Adiabatic,
    #[default]
    #[serde(rename = "")]
    Unset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub surface_type: SurfaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default)]
    pub construction_id: String,
    #[serde(default)]
    pub fenestrations: Vec<Value>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub adjacent_zone_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub adjacent_surface_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub adjacent_from: Option<String>,
    #[serde(default)]
    pub boundary_condition: BoundaryCondition,
    /// Created only to stand in for a direct surface-to-zone link.
    #[serde(rename = "isGenerated", default, skip_serializing_if = "is_false")]
    pub is_generated: bool,
    #[serde(rename = "isCopied", default, skip_serializing_if = "Option::is_none")]
    pub is_copied: Option<bool>,
    /// Engineering fields this crate carries verbatim (azimuth, coolroof_reflectance, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Surface {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, surface_type: SurfaceType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            surface_type,
            area: None,
            construction_id: String::new(),
            fenestrations: Vec::new(),
            adjacent_zone_id: None,
            adjacent_surface_id: None,
            adjacent_from: None,
            boundary_condition: BoundaryCondition::Unset,
            is_generated: false,
            is_copied: None,
            extra: Map::new(),
        }
    }

    /// True when this surface is the side the user linked directly.
    #[must_use]
    pub fn is_origin(&self) -> bool {
        self.adjacent_surface_id.is_some()
    }

    /// True when another surface created a link onto this one.
    #[must_use]
    pub fn is_partner(&self) -> bool {
        self.adjacent_from.is_some()
    }

    #[must_use]
    pub fn has_adjacency(&self) -> bool {
        self.is_origin() || self.is_partner()
    }

    #[must_use]
    pub fn has_any_reference(&self) -> bool {
        self.has_adjacency() || self.adjacent_zone_id.is_some()
    }

    /// Drops every adjacency reference and resets the boundary condition.
    pub fn unlink(&mut self) {
        self.adjacent_zone_id = None;
        self.adjacent_surface_id = None;
        self.adjacent_from = None;
        self.boundary_condition = BoundaryCondition::Unset;
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

// Older documents store an unset link as "".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_links_deserialize_as_none() {
        let json = r#"{
            "id": "s1", "name": "벽 1", "type": "wall",
            "adjacent_zone_id": "", "adjacent_surface_id": null,
            "boundary_condition": "", "azimuth": 90
        }"#;
        let surface: Surface = serde_json::from_str(json).unwrap();

        assert_eq!(surface.adjacent_zone_id, None);
        assert_eq!(surface.adjacent_surface_id, None);
        assert_eq!(surface.boundary_condition, BoundaryCondition::Unset);
        assert_eq!(surface.extra.get("azimuth"), Some(&Value::from(90)));
        assert!(!surface.has_any_reference());
    }

    #[test]
    fn serialization_keeps_engine_field_names() {
        let mut surface = Surface::new("s1", "바닥 1", SurfaceType::Floor);
        surface.adjacent_from = Some("s0".to_string());
        surface.is_generated = true;

        let value = serde_json::to_value(&surface).unwrap();
        assert_eq!(value["type"], "floor");
        assert_eq!(value["adjacent_from"], "s0");
        assert_eq!(value["isGenerated"], true);
        assert_eq!(value["boundary_condition"], "");
        assert!(value.get("adjacent_surface_id").is_none());
    }

    #[test]
    fn unlink_clears_every_reference() {
        let mut surface = Surface::new("s1", "벽 1", SurfaceType::Wall);
        surface.adjacent_surface_id = Some("s2".to_string());
        surface.adjacent_zone_id = Some("z2".to_string());
        surface.boundary_condition = BoundaryCondition::Zone;

        surface.unlink();

        assert!(!surface.has_any_reference());
        assert_eq!(surface.boundary_condition, BoundaryCondition::Unset);
    }
}
