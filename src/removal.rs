//! Deleting single floors, zones and surfaces from a tree.

use std::collections::HashSet;

use tracing::info;

use crate::adjacency::{clear_reverse_adjacency, sanitize};
use crate::error::EditError;
use crate::model::{Floor, Surface};

/// Removes one floor with everything on it.
pub fn remove_floor(floors: &[Floor], floor_id: &str) -> Result<Vec<Floor>, EditError> {
    let mut next = floors.to_vec();
    let Some(fi) = next.iter().position(|f| f.floor_id == floor_id) else {
        return Err(EditError::UnknownFloor {
            id: floor_id.to_string(),
        });
    };
    let floor = next.remove(fi);
    let removed = floor
        .zones
        .into_iter()
        .flat_map(|z| z.surfaces)
        .collect::<Vec<_>>();
    release(&mut next, &removed);

    info!(floor_id, surfaces = removed.len(), "removed floor");
    Ok(next)
}

pub fn remove_zone(floors: &[Floor], zone_id: &str) -> Result<Vec<Floor>, EditError> {
    let mut next = floors.to_vec();
    let mut removed = None;
    for floor in &mut next {
        if let Some(zi) = floor.zones.iter().position(|z| z.id == zone_id) {
            removed = Some(floor.zones.remove(zi).surfaces);
            break;
        }
    }
    let Some(removed) = removed else {
        return Err(EditError::UnknownZone {
            id: zone_id.to_string(),
        });
    };
    release(&mut next, &removed);

    info!(zone_id, surfaces = removed.len(), "removed zone");
    Ok(next)
}

pub fn remove_surface(floors: &[Floor], surface_id: &str) -> Result<Vec<Floor>, EditError> {
    let mut next = floors.to_vec();
    let mut removed = None;
    for zone in next.iter_mut().flat_map(|f| f.zones.iter_mut()) {
        if let Some(si) = zone.surfaces.iter().position(|s| s.id == surface_id) {
            removed = Some(zone.surfaces.remove(si));
            break;
        }
    }
    let Some(removed) = removed else {
        return Err(EditError::UnknownSurface {
            id: surface_id.to_string(),
        });
    };
    release(&mut next, std::slice::from_ref(&removed));

    info!(surface_id, "removed surface");
    Ok(next)
}

/// Repairs the tree after `removed` has been taken out of it.
///
/// Generated stand-ins that only existed for a link from a removed surface
/// go with it. Every other surface linked to a removed one is unlinked, and
/// the final sanitize drops zone references into removed zones.
fn release(floors: &mut [Floor], removed: &[Surface]) {
    let removed_ids: HashSet<&str> = removed.iter().map(|s| s.id.as_str()).collect();
    for zone in floors.iter_mut().flat_map(|f| f.zones.iter_mut()) {
        zone.surfaces.retain(|s| {
            !(s.is_generated
                && s.adjacent_from
                    .as_deref()
                    .is_some_and(|from| removed_ids.contains(from)))
        });
    }
    clear_reverse_adjacency(removed, floors);
    sanitize(floors);
}
