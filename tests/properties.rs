//! Property-based invariant tests for adjacency editing.
//!
//! Verifies over randomly shaped and randomly linked trees:
//! 1. Any sequence of links leaves the tree free of violations
//! 2. Sanitizing is idempotent, even on trees full of garbage references
//! 3. Removing a surface clears exactly its partner
//! 4. Overwriting K floors creates K×Z zone and K×S surface ids, all new
//! 5. Links inside a copied floor point at the clones of the same copy

use std::collections::HashSet;

use proptest::prelude::*;
use proptest::sample::Index;
use remodel_shape::adjacency::{check_tree, sanitize, set_adjacency};
use remodel_shape::model::tree::{all_surface_ids, all_zone_ids, find_surface, surfaces};
use remodel_shape::model::{
    Building, Document, Floor, IdGenerator, SequentialIds, Surface, SurfaceType, Version, Zone,
};
use remodel_shape::propagate::{apply_copy, CopyRequest, CopySource};
use remodel_shape::removal::remove_surface;

// ── Strategy helpers ──────────────────────────────────────────────────

/// Walls per zone, zones per floor, floors.
fn arb_layout() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..4, 1..4), 1..4)
}

fn arb_links() -> impl Strategy<Value = Vec<(Index, Index)>> {
    prop::collection::vec((any::<Index>(), any::<Index>()), 0..16)
}

fn build(layout: &[Vec<usize>], ids: &mut SequentialIds) -> Vec<Floor> {
    layout
        .iter()
        .enumerate()
        .map(|(fi, zones)| {
            let number = (layout.len() - fi) as i32;
            let zones = zones
                .iter()
                .map(|&walls| {
                    let mut surfaces = vec![
                        Surface::new(ids.next_id(), "바닥 1", SurfaceType::Floor),
                        Surface::new(ids.next_id(), "천장 1", SurfaceType::Ceiling),
                    ];
                    for k in 0..walls {
                        let name = format!("벽 {}", k + 1);
                        surfaces.push(Surface::new(ids.next_id(), name, SurfaceType::Wall));
                    }
                    Zone::new(ids.next_id(), "존").with_surfaces(surfaces)
                })
                .collect();
            Floor::new(ids.next_id(), format!("{number}층"), number).with_zones(zones)
        })
        .collect()
}

fn link_randomly(floors: &mut [Floor], links: &[(Index, Index)]) {
    let ids = all_surface_ids(floors);
    for (a, b) in links {
        let origin = &ids[a.index(ids.len())];
        let target = &ids[b.index(ids.len())];
        if origin == target {
            continue;
        }
        let zone = find_surface(floors, target)
            .map(|(_, z, _)| z.id.clone())
            .expect("target exists");
        set_adjacency(floors, origin, target, &zone).expect("both surfaces exist");
    }
}

fn linked_tree(layout: &[Vec<usize>], links: &[(Index, Index)]) -> Vec<Floor> {
    let mut floors = build(layout, &mut SequentialIds::new("s"));
    link_randomly(&mut floors, links);
    floors
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn links_keep_the_tree_consistent(layout in arb_layout(), links in arb_links()) {
        let floors = linked_tree(&layout, &links);
        prop_assert_eq!(check_tree(&floors), vec![]);
    }

    #[test]
    fn sanitize_is_idempotent(
        layout in arb_layout(),
        links in arb_links(),
        garbage in prop::collection::vec((any::<Index>(), 0u8..3), 0..8),
    ) {
        let mut floors = linked_tree(&layout, &links);
        let n = all_surface_ids(&floors).len();
        for (i, field) in garbage {
            let target = i.index(n);
            if let Some(s) = floors
                .iter_mut()
                .flat_map(|f| f.zones.iter_mut())
                .flat_map(|z| z.surfaces.iter_mut())
                .nth(target)
            {
                let bogus = Some(format!("gone-{target}"));
                match field {
                    0 => s.adjacent_zone_id = bogus,
                    1 => s.adjacent_surface_id = bogus,
                    _ => s.adjacent_from = bogus,
                }
            }
        }

        sanitize(&mut floors);
        let once = floors.clone();
        prop_assert_eq!(sanitize(&mut floors), 0);
        prop_assert_eq!(floors, once);
    }

    #[test]
    fn removing_a_surface_clears_exactly_its_partner(
        layout in arb_layout(),
        links in arb_links(),
        pick in any::<Index>(),
    ) {
        let floors = linked_tree(&layout, &links);
        let ids = all_surface_ids(&floors);
        let removed = &ids[pick.index(ids.len())];

        let partners: HashSet<&str> = surfaces(&floors)
            .filter(|s| {
                s.adjacent_surface_id.as_ref() == Some(removed)
                    || s.adjacent_from.as_ref() == Some(removed)
            })
            .map(|s| s.id.as_str())
            .collect();

        let next = remove_surface(&floors, removed).expect("surface exists");
        for before in surfaces(&floors).filter(|s| &s.id != removed) {
            let (_, _, after) = find_surface(&next, &before.id).expect("survivor");
            if partners.contains(before.id.as_str()) {
                prop_assert!(!after.has_any_reference());
            } else {
                prop_assert_eq!(after, before);
            }
        }
        prop_assert_eq!(check_tree(&next), vec![]);
    }

    #[test]
    fn floor_overwrite_mints_new_ids_and_keeps_internal_links(
        layout in arb_layout(),
        links in arb_links(),
        k in 1usize..4,
    ) {
        let before = linked_tree(&layout, &links);
        let mut ids = SequentialIds::new("t");
        let after: Vec<Floor> = (0..k)
            .map(|i| {
                let number = (k - i) as i32;
                Floor::new(ids.next_id(), format!("{number}층"), number)
                    .with_zones(vec![Zone::new(ids.next_id(), "존 1")])
            })
            .collect();
        let document = Document {
            before: Building::new(before.clone()),
            after: Building::new(after.clone()),
        };
        let base = &before[0];
        let targets: Vec<String> = after.iter().map(|f| f.floor_id.clone()).collect();

        let request = CopyRequest::overwrite(
            Version::Before,
            CopySource::Floor(base.floor_id.clone()),
            targets,
        );
        let next = apply_copy(&document, &request, &mut SequentialIds::new("n"))
            .expect("valid request");
        let copied = &next.after.shape_info;

        let old: HashSet<String> = all_zone_ids(&before)
            .into_iter()
            .chain(all_surface_ids(&before))
            .chain(all_zone_ids(&after))
            .chain(all_surface_ids(&after))
            .collect();
        let new_zones = all_zone_ids(copied);
        let new_surfaces = all_surface_ids(copied);
        let zones_per_copy = base.zones.len();
        let surfaces_per_copy: usize = base.zones.iter().map(|z| z.surfaces.len()).sum();

        prop_assert_eq!(new_zones.len(), k * zones_per_copy);
        prop_assert_eq!(new_surfaces.len(), k * surfaces_per_copy);
        let fresh: HashSet<&String> = new_zones.iter().chain(&new_surfaces).collect();
        prop_assert_eq!(fresh.len(), new_zones.len() + new_surfaces.len());
        prop_assert!(fresh.iter().all(|id| !old.contains(*id)));

        // Position of every surface in the base floor.
        let position = |floor: &Floor, id: &str| {
            floor.zones.iter().enumerate().find_map(|(zi, z)| {
                z.surfaces.iter().position(|s| s.id == id).map(|si| (zi, si))
            })
        };
        for copy in copied {
            for (zi, zone) in base.zones.iter().enumerate() {
                for (si, s) in zone.surfaces.iter().enumerate() {
                    let Some(target) = s.adjacent_surface_id.as_deref() else { continue };
                    let Some((tz, ts)) = position(base, target) else { continue };
                    let clone = &copy.zones[zi].surfaces[si];
                    let clone_target = &copy.zones[tz].surfaces[ts];
                    prop_assert_eq!(clone.adjacent_surface_id.as_ref(), Some(&clone_target.id));
                    prop_assert_eq!(clone_target.adjacent_from.as_ref(), Some(&clone.id));
                }
            }
        }
        prop_assert_eq!(check_tree(copied), vec![]);
    }
}
