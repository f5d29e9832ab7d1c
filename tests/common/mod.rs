//! Two-floor building shared by the integration tests.
//!
//! Every id is prefixed so the same layout can sit in both versions without
//! collisions.
//!
//! ```text
//! 2층  zone2: slab2, ceil2, wall5 ──▶ zone3: slab3, ceil3, wall6
//!        ▲
//! 1층  zone1: ground1, ceil1 (links up to slab2), wall1..wall4
//! ```

#![allow(dead_code)]

use remodel_shape::adjacency::set_adjacency;
use remodel_shape::model::{
    Building, Document, Floor, PhotovoltaicSystem, Surface, SurfaceType, Zone,
};

pub fn id(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

fn surface(prefix: &str, name: &str, surface_type: SurfaceType) -> Surface {
    Surface::new(id(prefix, name), name, surface_type)
}

pub fn floors(prefix: &str) -> Vec<Floor> {
    use SurfaceType::{Ceiling, Floor as Slab, Wall};

    let zone1 = Zone::new(id(prefix, "zone1"), "존 1").with_surfaces(vec![
        surface(prefix, "ground1", Slab),
        surface(prefix, "ceil1", Ceiling),
        surface(prefix, "wall1", Wall),
        surface(prefix, "wall2", Wall),
        surface(prefix, "wall3", Wall),
        surface(prefix, "wall4", Wall),
    ]);
    let zone2 = Zone::new(id(prefix, "zone2"), "존 1").with_surfaces(vec![
        surface(prefix, "slab2", Slab),
        surface(prefix, "ceil2", Ceiling),
        surface(prefix, "wall5", Wall),
    ]);
    let zone3 = Zone::new(id(prefix, "zone3"), "존 2").with_surfaces(vec![
        surface(prefix, "slab3", Slab),
        surface(prefix, "ceil3", Ceiling),
        surface(prefix, "wall6", Wall),
    ]);

    let mut floors = vec![
        Floor::new(id(prefix, "floor2"), "2층", 2).with_zones(vec![zone2, zone3]),
        Floor::new(id(prefix, "floor1"), "1층", 1).with_zones(vec![zone1]),
    ];
    set_adjacency(&mut floors, &id(prefix, "wall5"), &id(prefix, "wall6"), &id(prefix, "zone3"))
        .expect("fixture link");
    set_adjacency(&mut floors, &id(prefix, "ceil1"), &id(prefix, "slab2"), &id(prefix, "zone2"))
        .expect("fixture link");
    floors
}

pub fn building(prefix: &str) -> Building {
    let mut building = Building::new(floors(prefix));
    building.photovoltaic_systems = vec![
        PhotovoltaicSystem::new(id(prefix, "pv_1"), "PV 1"),
        PhotovoltaicSystem::new(id(prefix, "pv_2"), "PV 2"),
    ];
    building
}

/// `b-` ids before the remodel, `a-` ids after.
pub fn document() -> Document {
    Document {
        before: building("b-"),
        after: building("a-"),
    }
}
