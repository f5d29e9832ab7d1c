//! Count-driven structural edits: grow or shrink floors, zones and surfaces.
//!
//! Every function takes the current tree by reference and returns the next
//! one. Entities are removed from the outer end only, and the links they took
//! part in are released before they go. The returned tree is sanitized.

use tracing::{debug, info};

use crate::adjacency::{clear_reverse_adjacency, sanitize};
use crate::config::ResizeLimits;
use crate::error::EditError;
use crate::model::{format_floor_number, Floor, IdGenerator, Surface, SurfaceType, Zone};

/// Which stack of floors a floor-count edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorSide {
    Above,
    Below,
}

impl FloorSide {
    const fn contains(self, floor_number: i32) -> bool {
        match self {
            Self::Above => floor_number > 0,
            Self::Below => floor_number < 0,
        }
    }

    /// Floor number of the `k`-th floor (1-based) counted away from the ground.
    fn number(self, k: usize) -> i32 {
        let k = i32::try_from(k).unwrap_or(i32::MAX);
        match self {
            Self::Above => k,
            Self::Below => -k,
        }
    }
}

/// `"3층"`, `"B2층"`.
#[must_use]
pub fn floor_name(floor_number: i32) -> String {
    format!("{}층", format_floor_number(floor_number))
}

#[must_use]
pub fn new_surface(surface_type: SurfaceType, k: usize, ids: &mut impl IdGenerator) -> Surface {
    Surface::new(ids.next_id(), format!("{} {k}", surface_type.label()), surface_type)
}

/// A zone with the default floor and ceiling surface pair.
#[must_use]
pub fn new_zone(k: usize, ids: &mut impl IdGenerator) -> Zone {
    let id = ids.next_id();
    Zone::new(id, format!("존 {k}")).with_surfaces(vec![
        new_surface(SurfaceType::Floor, 1, ids),
        new_surface(SurfaceType::Ceiling, 1, ids),
    ])
}

#[must_use]
pub fn new_floor(floor_number: i32, ids: &mut impl IdGenerator) -> Floor {
    let id = ids.next_id();
    Floor::new(id, floor_name(floor_number), floor_number).with_zones(vec![new_zone(1, ids)])
}

/// Sets how many floors lie on `side` of the ground.
///
/// Growing adds floors on the outer end (top of the above-ground stack,
/// bottom of the basement). Shrinking drops the outermost floors. Floor
/// numbers on that side are renumbered to stay contiguous, and a floor that
/// still carries the default name of its old number is renamed to match the
/// new one. The count is clamped to [`ResizeLimits::max_floors_per_side`]; the
/// result is ordered by descending floor number.
#[must_use]
pub fn set_floor_count(
    floors: &[Floor],
    side: FloorSide,
    count: i64,
    limits: &ResizeLimits,
    ids: &mut impl IdGenerator,
) -> Vec<Floor> {
    let count = limits.clamp_floors(count);

    let (mut stack, mut others): (Vec<Floor>, Vec<Floor>) = floors
        .iter()
        .cloned()
        .partition(|f| side.contains(f.floor_number));
    // Nearest the ground first.
    stack.sort_by_key(|f| f.floor_number.unsigned_abs());

    let current = stack.len();
    if count < current {
        let removed = stack.split_off(count);
        let removed_surfaces: Vec<Surface> = removed
            .iter()
            .flat_map(|f| f.zones.iter().flat_map(|z| z.surfaces.iter().cloned()))
            .collect();
        clear_reverse_adjacency(&removed_surfaces, &mut stack);
        clear_reverse_adjacency(&removed_surfaces, &mut others);
        debug!(removed = removed.len(), ?side, "dropped outermost floors");
    }

    for (k, floor) in stack.iter_mut().enumerate() {
        let number = side.number(k + 1);
        if floor.floor_name == floor_name(floor.floor_number) {
            floor.floor_name = floor_name(number);
        }
        floor.floor_number = number;
    }
    for k in current..count {
        stack.push(new_floor(side.number(k + 1), ids));
    }

    let mut next = others;
    next.append(&mut stack);
    next.sort_by(|a, b| b.floor_number.cmp(&a.floor_number));
    sanitize(&mut next);

    info!(?side, from = current, to = count, "resized floors");
    next
}

/// Sets the number of zones on one floor, adding `"존 {k}"` zones or dropping
/// the last ones. The count is clamped between
/// [`ResizeLimits::min_zones_per_floor`] and [`ResizeLimits::max_zones_per_floor`].
pub fn set_zone_count(
    floors: &[Floor],
    floor_id: &str,
    count: i64,
    limits: &ResizeLimits,
    ids: &mut impl IdGenerator,
) -> Result<Vec<Floor>, EditError> {
    let mut next = floors.to_vec();
    let Some(fi) = next.iter().position(|f| f.floor_id == floor_id) else {
        return Err(EditError::UnknownFloor {
            id: floor_id.to_string(),
        });
    };
    let count = limits.clamp_zones(count);
    let current = next[fi].zones.len();

    if count < current {
        let removed = next[fi].zones.split_off(count);
        let removed_surfaces: Vec<Surface> = removed
            .iter()
            .flat_map(|z| z.surfaces.iter().cloned())
            .collect();
        clear_reverse_adjacency(&removed_surfaces, &mut next);
    } else {
        for k in current..count {
            let zone = new_zone(k + 1, ids);
            next[fi].zones.push(zone);
        }
    }
    sanitize(&mut next);

    info!(floor_id, from = current, to = count, "resized zones");
    Ok(next)
}

/// Sets the number of surfaces of one type in a zone.
///
/// New surfaces are named `"{label} {k}"` continuing the existing count;
/// shrinking drops the last surfaces of that type. Surfaces stay ordered
/// floor, ceiling, wall.
pub fn set_surface_count(
    floors: &[Floor],
    zone_id: &str,
    surface_type: SurfaceType,
    count: i64,
    limits: &ResizeLimits,
    ids: &mut impl IdGenerator,
) -> Result<Vec<Floor>, EditError> {
    let mut next = floors.to_vec();
    let Some((fi, zi)) = next.iter().enumerate().find_map(|(fi, f)| {
        f.zones
            .iter()
            .position(|z| z.id == zone_id)
            .map(|zi| (fi, zi))
    }) else {
        return Err(EditError::UnknownZone {
            id: zone_id.to_string(),
        });
    };
    let count = limits.clamp_surfaces(surface_type, count);

    let zone = &mut next[fi].zones[zi];
    let (mut same, others): (Vec<Surface>, Vec<Surface>) = std::mem::take(&mut zone.surfaces)
        .into_iter()
        .partition(|s| s.surface_type == surface_type);
    let current = same.len();

    let removed = if count < current {
        same.split_off(count)
    } else {
        for k in current..count {
            same.push(new_surface(surface_type, k + 1, ids));
        }
        Vec::new()
    };

    zone.surfaces = others;
    zone.surfaces.append(&mut same);
    zone.surfaces.sort_by_key(|s| s.surface_type.sort_order());

    clear_reverse_adjacency(&removed, &mut next);
    sanitize(&mut next);

    info!(zone_id, ?surface_type, from = current, to = count, "resized surfaces");
    Ok(next)
}
