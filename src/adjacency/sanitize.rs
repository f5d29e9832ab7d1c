use tracing::debug;

use crate::model::tree::{surfaces_mut, IdIndex};
use crate::model::Floor;

/// Nulls every adjacency reference whose target no longer exists anywhere in
/// the tree. Returns how many references were nulled.
///
/// Only the offending field is cleared; boundary conditions are untouched.
/// Running it twice changes nothing the second time.
pub fn sanitize(floors: &mut [Floor]) -> usize {
    let index = IdIndex::build(floors);
    let mut nulled = 0;

    for surface in surfaces_mut(floors) {
        if surface
            .adjacent_zone_id
            .as_ref()
            .is_some_and(|id| !index.zones.contains(id))
        {
            surface.adjacent_zone_id = None;
            nulled += 1;
        }
        if surface
            .adjacent_surface_id
            .as_ref()
            .is_some_and(|id| !index.surfaces.contains(id))
        {
            surface.adjacent_surface_id = None;
            nulled += 1;
        }
        if surface
            .adjacent_from
            .as_ref()
            .is_some_and(|id| !index.surfaces.contains(id))
        {
            surface.adjacent_from = None;
            nulled += 1;
        }
    }

    if nulled > 0 {
        debug!(nulled, "sanitized dangling adjacency references");
    }
    nulled
}

/// Pure form of [`sanitize`].
#[must_use]
pub fn sanitized(floors: &[Floor]) -> Vec<Floor> {
    let mut next = floors.to_vec();
    sanitize(&mut next);
    next
}
