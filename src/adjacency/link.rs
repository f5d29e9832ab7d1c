use std::collections::HashSet;

use tracing::debug;

use crate::error::EditError;
use crate::model::tree::{find_zone, locate_surface, surface_mut, surfaces, surfaces_mut};
use crate::model::{BoundaryCondition, Floor, Surface};

/// Releases every surviving surface linked to one of `removed`.
///
/// A surface is released when `removed` points at it (through
/// `adjacent_surface_id` or `adjacent_from`) or when it points at a removed
/// surface. Released surfaces lose all three link fields and their boundary
/// condition drops to `""`. Surfaces in `removed` themselves are left alone,
/// the caller is about to drop them. Returns the number of surfaces released.
pub fn clear_reverse_adjacency(removed: &[Surface], floors: &mut [Floor]) -> usize {
    let removed_ids: HashSet<&str> = removed.iter().map(|s| s.id.as_str()).collect();
    let pointed: HashSet<String> = removed
        .iter()
        .flat_map(|s| [s.adjacent_surface_id.clone(), s.adjacent_from.clone()])
        .flatten()
        .collect();

    let mut released = 0;
    for surface in surfaces_mut(floors) {
        if removed_ids.contains(surface.id.as_str()) {
            continue;
        }
        let points_at_removed = [&surface.adjacent_surface_id, &surface.adjacent_from]
            .into_iter()
            .flatten()
            .any(|id| removed_ids.contains(id.as_str()));

        if pointed.contains(&surface.id) || points_at_removed {
            surface.unlink();
            released += 1;
        }
    }

    debug!(removed = removed.len(), released, "cleared reverse adjacency");
    released
}

/// Links `origin_id` to `target_id` unconditionally.
///
/// Afterwards the origin carries `adjacent_surface_id`/`adjacent_zone_id`
/// with a `zone` boundary condition and the target carries `adjacent_from`.
/// Any link either surface held before is released first: generated stand-in
/// surfaces that only existed for the old link are deleted, other former
/// partners are reverted to unlinked.
///
/// Eligibility is not checked here; see [`super::link_surfaces`].
pub fn set_adjacency(
    floors: &mut [Floor],
    origin_id: &str,
    target_id: &str,
    target_zone_id: &str,
) -> Result<(), EditError> {
    if origin_id == target_id {
        return Err(EditError::SelfLink {
            id: origin_id.to_string(),
        });
    }
    let Some(origin_path) = locate_surface(floors, origin_id) else {
        return Err(unknown_surface(origin_id));
    };
    let Some(target_path) = locate_surface(floors, target_id) else {
        return Err(unknown_surface(target_id));
    };
    if find_zone(floors, target_zone_id).is_none() {
        return Err(EditError::UnknownZone {
            id: target_zone_id.to_string(),
        });
    }

    let origin_zone_id = floors[origin_path.floor].zones[origin_path.zone].id.clone();
    let origin = surface_mut(floors, origin_path).clone();
    let target = surface_mut(floors, target_path).clone();

    let stale = StaleLinks {
        origin_id,
        target_id,
        target_partner: target.adjacent_surface_id.as_deref(),
        sources: [
            (origin.adjacent_from.as_deref(), origin_id),
            (target.adjacent_from.as_deref(), target_id),
        ],
    };

    let mut dropped = 0;
    let mut released = 0;
    for zone in floors.iter_mut().flat_map(|f| f.zones.iter_mut()) {
        let before = zone.surfaces.len();
        zone.surfaces
            .retain(|s| !(s.is_generated && stale.is_derived_partner(s) && !stale.is_pair(s)));
        dropped += before - zone.surfaces.len();

        for surface in &mut zone.surfaces {
            if stale.is_pair(surface) {
                continue;
            }
            if stale.is_derived_partner(surface) || stale.is_source(surface) {
                surface.unlink();
                released += 1;
            }
        }
    }

    // Deleting generated surfaces may have shifted positions.
    let (Some(origin_path), Some(target_path)) = (
        locate_surface(floors, origin_id),
        locate_surface(floors, target_id),
    ) else {
        return Err(unknown_surface(origin_id));
    };

    let origin = surface_mut(floors, origin_path);
    origin.adjacent_surface_id = Some(target_id.to_string());
    origin.adjacent_zone_id = Some(target_zone_id.to_string());
    origin.adjacent_from = None;
    origin.boundary_condition = BoundaryCondition::Zone;

    let target = surface_mut(floors, target_path);
    target.adjacent_from = Some(origin_id.to_string());
    target.adjacent_surface_id = None;
    target.adjacent_zone_id = Some(origin_zone_id);
    if target.boundary_condition == BoundaryCondition::Zone {
        target.boundary_condition = BoundaryCondition::Unset;
    }

    debug!(origin_id, target_id, dropped, released, "set adjacency");
    Ok(())
}

/// Former links of the two surfaces being paired.
struct StaleLinks<'a> {
    origin_id: &'a str,
    target_id: &'a str,
    /// Surface the target pointed at before becoming a partner.
    target_partner: Option<&'a str>,
    /// `(surface that linked onto X, X)` for X in {origin, target}.
    sources: [(Option<&'a str>, &'a str); 2],
}

impl StaleLinks<'_> {
    fn is_pair(&self, s: &Surface) -> bool {
        s.id == self.origin_id || s.id == self.target_id
    }

    fn is_derived_partner(&self, s: &Surface) -> bool {
        let from = s.adjacent_from.as_deref();
        from == Some(self.origin_id)
            || (self.target_partner == Some(s.id.as_str()) && from == Some(self.target_id))
    }

    fn is_source(&self, s: &Surface) -> bool {
        self.sources.iter().any(|(source, linked)| {
            *source == Some(s.id.as_str()) && s.adjacent_surface_id.as_deref() == Some(*linked)
        })
    }
}

/// Releases every link `surface_id` takes part in.
///
/// Generated surfaces that only stood in for a link from this surface are
/// deleted; other partners lose `adjacent_from` and `adjacent_zone_id`. If the
/// surface was itself a partner, the surface that linked onto it is reverted.
pub fn remove_adjacency(floors: &mut [Floor], surface_id: &str) -> Result<(), EditError> {
    let Some(path) = locate_surface(floors, surface_id) else {
        return Err(unknown_surface(surface_id));
    };
    let source = surface_mut(floors, path).adjacent_from.clone();

    for zone in floors.iter_mut().flat_map(|f| f.zones.iter_mut()) {
        zone.surfaces
            .retain(|s| !(s.is_generated && s.adjacent_from.as_deref() == Some(surface_id)));

        for s in &mut zone.surfaces {
            if s.id == surface_id {
                s.adjacent_surface_id = None;
                s.adjacent_zone_id = None;
                s.adjacent_from = None;
                if s.boundary_condition == BoundaryCondition::Zone {
                    s.boundary_condition = BoundaryCondition::Unset;
                }
            } else if s.adjacent_from.as_deref() == Some(surface_id) {
                s.adjacent_from = None;
                s.adjacent_zone_id = None;
            } else if source.as_deref() == Some(s.id.as_str())
                && s.adjacent_surface_id.as_deref() == Some(surface_id)
            {
                s.unlink();
            }
        }
    }

    debug!(surface_id, "removed adjacency");
    Ok(())
}

/// Whether switching `surface_id` to `condition` would break a live link.
///
/// The presentation layer asks this before [`change_boundary_condition`] so it
/// can put a confirmation in front of the mutation.
#[must_use]
pub fn would_destroy_link(
    floors: &[Floor],
    surface_id: &str,
    condition: BoundaryCondition,
) -> bool {
    surfaces(floors)
        .find(|s| s.id == surface_id)
        .is_some_and(|s| {
            s.boundary_condition == BoundaryCondition::Zone
                && condition != BoundaryCondition::Zone
                && s.has_adjacency()
        })
}

/// Sets a surface's boundary condition, releasing its links first when the
/// new condition is anything but `zone`.
pub fn change_boundary_condition(
    floors: &mut [Floor],
    surface_id: &str,
    condition: BoundaryCondition,
) -> Result<(), EditError> {
    let Some(path) = locate_surface(floors, surface_id) else {
        return Err(unknown_surface(surface_id));
    };
    if condition != BoundaryCondition::Zone && surface_mut(floors, path).has_any_reference() {
        remove_adjacency(floors, surface_id)?;
    }
    let Some(path) = locate_surface(floors, surface_id) else {
        return Err(unknown_surface(surface_id));
    };
    surface_mut(floors, path).boundary_condition = condition;
    Ok(())
}

fn unknown_surface(id: &str) -> EditError {
    EditError::UnknownSurface { id: id.to_string() }
}
