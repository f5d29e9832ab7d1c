//! Lookups over a floor tree.
//!
//! Adjacency is stored as string ids, so every operation resolves ids through
//! these helpers (or through a set built fresh for the call) instead of
//! holding references between entities.

use super::{Floor, Surface, Zone};
use std::collections::HashSet;

/// Position of a surface inside a floor tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePath {
    pub floor: usize,
    pub zone: usize,
    pub surface: usize,
}

pub fn surfaces(floors: &[Floor]) -> impl Iterator<Item = &Surface> {
    floors
        .iter()
        .flat_map(|f| f.zones.iter())
        .flat_map(|z| z.surfaces.iter())
}

pub fn zones(floors: &[Floor]) -> impl Iterator<Item = &Zone> {
    floors.iter().flat_map(|f| f.zones.iter())
}

pub fn surfaces_mut(floors: &mut [Floor]) -> impl Iterator<Item = &mut Surface> {
    floors
        .iter_mut()
        .flat_map(|f| f.zones.iter_mut())
        .flat_map(|z| z.surfaces.iter_mut())
}

#[must_use]
pub fn all_floor_ids(floors: &[Floor]) -> Vec<String> {
    floors.iter().map(|f| f.floor_id.clone()).collect()
}

#[must_use]
pub fn all_zone_ids(floors: &[Floor]) -> Vec<String> {
    zones(floors).map(|z| z.id.clone()).collect()
}

#[must_use]
pub fn all_surface_ids(floors: &[Floor]) -> Vec<String> {
    surfaces(floors).map(|s| s.id.clone()).collect()
}

#[must_use]
pub fn find_floor<'a>(floors: &'a [Floor], floor_id: &str) -> Option<&'a Floor> {
    floors.iter().find(|f| f.floor_id == floor_id)
}

#[must_use]
pub fn find_zone<'a>(floors: &'a [Floor], zone_id: &str) -> Option<(&'a Floor, &'a Zone)> {
    floors.iter().find_map(|floor| {
        floor
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .map(|zone| (floor, zone))
    })
}

#[must_use]
pub fn locate_surface(floors: &[Floor], surface_id: &str) -> Option<SurfacePath> {
    for (fi, floor) in floors.iter().enumerate() {
        for (zi, zone) in floor.zones.iter().enumerate() {
            if let Some(si) = zone.surfaces.iter().position(|s| s.id == surface_id) {
                return Some(SurfacePath {
                    floor: fi,
                    zone: zi,
                    surface: si,
                });
            }
        }
    }
    None
}

/// Floor, zone and surface containing `surface_id`.
#[must_use]
pub fn find_surface<'a>(
    floors: &'a [Floor],
    surface_id: &str,
) -> Option<(&'a Floor, &'a Zone, &'a Surface)> {
    let path = locate_surface(floors, surface_id)?;
    let floor = &floors[path.floor];
    let zone = &floor.zones[path.zone];
    Some((floor, zone, &zone.surfaces[path.surface]))
}

pub fn surface_mut<'a>(floors: &'a mut [Floor], path: SurfacePath) -> &'a mut Surface {
    &mut floors[path.floor].zones[path.zone].surfaces[path.surface]
}

/// Every zone and surface id present in the tree.
#[derive(Debug, Default, Clone)]
pub struct IdIndex {
    pub zones: HashSet<String>,
    pub surfaces: HashSet<String>,
}

impl IdIndex {
    #[must_use]
    pub fn build(floors: &[Floor]) -> Self {
        let mut index = Self::default();
        for zone in zones(floors) {
            index.insert_zone(zone);
        }
        index
    }

    /// Adds a zone and all of its surfaces.
    pub fn insert_zone(&mut self, zone: &Zone) {
        self.zones.insert(zone.id.clone());
        self.surfaces.extend(zone.surfaces.iter().map(|s| s.id.clone()));
    }

    #[must_use]
    pub fn contains_surface(&self, id: Option<&str>) -> bool {
        id.is_some_and(|id| self.surfaces.contains(id))
    }

    #[must_use]
    pub fn contains_zone(&self, id: Option<&str>) -> bool {
        id.is_some_and(|id| self.zones.contains(id))
    }
}
