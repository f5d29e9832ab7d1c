//! Merging a selected slice of one version into another.
//!
//! [`copy_shape_info`] builds the preview with the origin's ids untouched;
//! [`merge_selection`] is what gets committed.

use tracing::info;

use crate::adjacency::sanitize;
use crate::model::{Building, Floor, IdGenerator, PhotovoltaicSystem, Zone};
use crate::propagate::clone_zones;
use crate::selection::SelectionState;

fn mark_zone(zone: &Zone, copied: bool) -> Zone {
    let mut zone = zone.clone();
    zone.is_copied = Some(copied);
    for surface in &mut zone.surfaces {
        surface.is_copied = Some(copied);
    }
    zone
}

/// The part of `origin` named by `selection`, flagged as copied.
fn selected_floors(origin: &Building, selection: &SelectionState) -> Vec<Floor> {
    origin
        .shape_info
        .iter()
        .filter(|f| selection.floors.contains(&f.floor_id))
        .map(|floor| {
            let zones = floor
                .zones
                .iter()
                .filter(|z| selection.zones.contains(&z.id))
                .map(|zone| {
                    let mut zone = zone.clone();
                    zone.surfaces.retain(|s| selection.surfaces.contains(&s.id));
                    mark_zone(&zone, true)
                })
                .collect();
            Floor {
                zones,
                is_copied: Some(true),
                ..floor.clone()
            }
        })
        .collect()
}

/// Builds the merged building shown as the copy preview.
///
/// Every entity of `target` is flagged `isCopied = false`; the selected
/// entities of `origin` are flagged `true`. A selected floor whose
/// `floor_number` already exists in the target has its zones appended to that
/// floor, other selected floors are added as they are. Floors come out in
/// descending floor-number order, photovoltaic systems as the target's own
/// followed by the selected ones from `origin`. Neither input is modified.
#[must_use]
pub fn copy_shape_info(
    selection: &SelectionState,
    origin: &Building,
    target: &Building,
) -> Building {
    merge_into(selection, origin, target, selected_floors(origin, selection))
}

/// Merges the selection into `target` for committing.
///
/// Same layout as [`copy_shape_info`], but every copied floor, zone and
/// surface gets a fresh id from `ids`. Links between copied surfaces follow
/// the new ids, links that leave the selection are dropped, and the merged
/// tree is sanitized.
#[must_use]
pub fn merge_selection(
    selection: &SelectionState,
    origin: &Building,
    target: &Building,
    ids: &mut impl IdGenerator,
) -> Building {
    let mut added = selected_floors(origin, selection);
    let zones: Vec<Zone> = added.iter().flat_map(|f| f.zones.iter().cloned()).collect();
    let mut cloned = clone_zones(&zones, ids).into_iter();
    for floor in &mut added {
        floor.floor_id = ids.next_id();
        floor.zones = cloned.by_ref().take(floor.zones.len()).collect();
    }

    let mut merged = merge_into(selection, origin, target, added);
    sanitize(&mut merged.shape_info);
    merged
}

fn merge_into(
    selection: &SelectionState,
    origin: &Building,
    target: &Building,
    mut added: Vec<Floor>,
) -> Building {
    let mut shape_info: Vec<Floor> = target
        .shape_info
        .iter()
        .map(|floor| {
            let mut merged = Floor {
                zones: floor.zones.iter().map(|z| mark_zone(z, false)).collect(),
                is_copied: Some(false),
                ..floor.clone()
            };
            if let Some(i) = added
                .iter()
                .position(|a| a.floor_number == floor.floor_number)
            {
                merged.zones.append(&mut added.remove(i).zones);
            }
            merged
        })
        .collect();
    shape_info.append(&mut added);
    shape_info.sort_by(|a, b| b.floor_number.cmp(&a.floor_number));

    let photovoltaic_systems = target
        .photovoltaic_systems
        .iter()
        .map(|pv| (pv, false))
        .chain(
            origin
                .photovoltaic_systems
                .iter()
                .filter(|pv| selection.photovoltaic_systems.contains(&pv.id))
                .map(|pv| (pv, true)),
        )
        .map(|(pv, copied)| PhotovoltaicSystem {
            is_copied: Some(copied),
            ..pv.clone()
        })
        .collect();

    info!(
        floors = selection.floors.len(),
        zones = selection.zones.len(),
        surfaces = selection.surfaces.len(),
        "merged selection into target"
    );
    Building {
        shape_info,
        photovoltaic_systems,
    }
}
