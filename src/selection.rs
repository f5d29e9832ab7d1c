//! Which floors, zones, surfaces and photovoltaic systems are marked for a
//! copy-merge.
//!
//! The reducer never looks at adjacency and never edits the tree; it only
//! decides what [`crate::merge::copy_shape_info`] will later take.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::tree::{
    all_floor_ids, all_surface_ids, all_zone_ids, find_floor, find_surface, find_zone,
};
use crate::model::Building;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionState {
    pub floors: BTreeSet<String>,
    pub zones: BTreeSet<String>,
    pub surfaces: BTreeSet<String>,
    pub photovoltaic_systems: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    ToggleBuildingAll(bool),
    TogglePhotovoltaicAll(bool),
    ToggleFloor { floor_id: String, checked: bool },
    ToggleZone { zone_id: String, checked: bool },
    ToggleSurface { surface_id: String, checked: bool },
    TogglePhotovoltaic { system_id: String, checked: bool },
}

/// Checkbox state of one row in the selection tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

/// Row whose [`CheckState`] is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckItem<'a> {
    Building,
    Floor(&'a str),
    Zone(&'a str),
    Surface(&'a str),
    Photovoltaic(&'a str),
    PhotovoltaicAll,
}

fn toggle(set: &mut BTreeSet<String>, ids: impl IntoIterator<Item = String>, checked: bool) {
    for id in ids {
        if checked {
            set.insert(id);
        } else {
            set.remove(&id);
        }
    }
}

impl SelectionState {
    /// Returns the state after `action`, resolving parents and children
    /// against `building`.
    ///
    /// Checking a zone or surface also checks its parents; unchecking one
    /// never unchecks a parent.
    #[must_use]
    pub fn reduce(&self, action: &SelectionAction, building: &Building) -> Self {
        let floors = &building.shape_info;
        let mut next = self.clone();

        match action {
            SelectionAction::ToggleBuildingAll(checked) => {
                if *checked {
                    next.floors = all_floor_ids(floors).into_iter().collect();
                    next.zones = all_zone_ids(floors).into_iter().collect();
                    next.surfaces = all_surface_ids(floors).into_iter().collect();
                } else {
                    next.floors.clear();
                    next.zones.clear();
                    next.surfaces.clear();
                }
            }
            SelectionAction::TogglePhotovoltaicAll(checked) => {
                next.photovoltaic_systems = if *checked {
                    building
                        .photovoltaic_systems
                        .iter()
                        .map(|pv| pv.id.clone())
                        .collect()
                } else {
                    BTreeSet::new()
                };
            }
            SelectionAction::ToggleFloor { floor_id, checked } => {
                toggle(&mut next.floors, [floor_id.clone()], *checked);
                if let Some(floor) = find_floor(floors, floor_id) {
                    let zones = floor.zones.iter().map(|z| z.id.clone());
                    toggle(&mut next.zones, zones, *checked);
                    let surfaces = floor
                        .zones
                        .iter()
                        .flat_map(|z| z.surfaces.iter().map(|s| s.id.clone()));
                    toggle(&mut next.surfaces, surfaces, *checked);
                }
            }
            SelectionAction::ToggleZone { zone_id, checked } => {
                toggle(&mut next.zones, [zone_id.clone()], *checked);
                if let Some((floor, zone)) = find_zone(floors, zone_id) {
                    toggle(
                        &mut next.surfaces,
                        zone.surfaces.iter().map(|s| s.id.clone()),
                        *checked,
                    );
                    if *checked {
                        next.floors.insert(floor.floor_id.clone());
                    }
                }
            }
            SelectionAction::ToggleSurface {
                surface_id,
                checked,
            } => {
                toggle(&mut next.surfaces, [surface_id.clone()], *checked);
                if *checked {
                    if let Some((floor, zone, _)) = find_surface(floors, surface_id) {
                        next.zones.insert(zone.id.clone());
                        next.floors.insert(floor.floor_id.clone());
                    }
                }
            }
            SelectionAction::TogglePhotovoltaic { system_id, checked } => {
                toggle(&mut next.photovoltaic_systems, [system_id.clone()], *checked);
            }
        }
        next
    }

    /// Three-state for the building, floors and zones; two-state for
    /// surfaces and photovoltaic rows.
    #[must_use]
    pub fn check_state(&self, item: CheckItem<'_>, building: &Building) -> CheckState {
        let floors = &building.shape_info;
        match item {
            CheckItem::Building => {
                if self.floors.is_empty() {
                    return CheckState::Unchecked;
                }
                let all = all_floor_ids(floors).iter().all(|id| self.floors.contains(id))
                    && all_zone_ids(floors).iter().all(|id| self.zones.contains(id))
                    && all_surface_ids(floors).iter().all(|id| self.surfaces.contains(id));
                if all {
                    CheckState::Checked
                } else {
                    CheckState::Indeterminate
                }
            }
            CheckItem::Floor(id) => {
                if !self.floors.contains(id) {
                    return CheckState::Unchecked;
                }
                let all = find_floor(floors, id).into_iter().all(|floor| {
                    floor.zones.iter().all(|z| {
                        self.zones.contains(&z.id)
                            && z.surfaces.iter().all(|s| self.surfaces.contains(&s.id))
                    })
                });
                if all {
                    CheckState::Checked
                } else {
                    CheckState::Indeterminate
                }
            }
            CheckItem::Zone(id) => {
                if !self.zones.contains(id) {
                    return CheckState::Unchecked;
                }
                let all = find_zone(floors, id).into_iter().all(|(_, zone)| {
                    zone.surfaces.iter().all(|s| self.surfaces.contains(&s.id))
                });
                if all {
                    CheckState::Checked
                } else {
                    CheckState::Indeterminate
                }
            }
            CheckItem::Surface(id) => self.surfaces.contains(id).into(),
            CheckItem::Photovoltaic(id) => self.photovoltaic_systems.contains(id).into(),
            CheckItem::PhotovoltaicAll => building
                .photovoltaic_systems
                .iter()
                .all(|pv| self.photovoltaic_systems.contains(&pv.id))
                .into(),
        }
    }
}
