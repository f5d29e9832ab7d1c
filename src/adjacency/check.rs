//! Read-only verification of the adjacency invariants.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::model::tree::{surfaces, IdIndex};
use crate::model::{BoundaryCondition, Floor, Surface};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A link field names an id that exists nowhere in the tree.
    Dangling {
        surface_id: String,
        field: &'static str,
        reference: String,
    },
    /// `origin` points at `target` but `target` does not point back.
    Asymmetric { origin: String, target: String },
    /// `partner` claims `from` linked onto it, but `from` points elsewhere.
    OrphanPartner { partner: String, from: String },
    /// Both `adjacent_surface_id` and `adjacent_from` are set.
    DoubleRole { surface_id: String },
    /// The boundary condition is `zone` on a non-origin, or an origin is not `zone`.
    BoundaryMismatch { surface_id: String },
    /// An id is used by more than one entity.
    DuplicateId { id: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dangling {
                surface_id,
                field,
                reference,
            } => write!(f, "{surface_id}: {field} points at missing '{reference}'"),
            Self::Asymmetric { origin, target } => {
                write!(f, "{origin} links to {target}, which does not link back")
            }
            Self::OrphanPartner { partner, from } => {
                write!(f, "{partner} claims a link from {from}, which points elsewhere")
            }
            Self::DoubleRole { surface_id } => {
                write!(f, "{surface_id} is both origin and partner of a link")
            }
            Self::BoundaryMismatch { surface_id } => {
                write!(f, "{surface_id}: boundary condition disagrees with its link role")
            }
            Self::DuplicateId { id } => write!(f, "id '{id}' is used more than once"),
        }
    }
}

/// Lists every invariant violation in one version's tree.
#[must_use]
pub fn check_tree(floors: &[Floor]) -> Vec<Violation> {
    let index = IdIndex::build(floors);
    let by_id: HashMap<&str, &Surface> = surfaces(floors).map(|s| (s.id.as_str(), s)).collect();
    let mut violations = Vec::new();

    for s in surfaces(floors) {
        for (field, reference, valid) in [
            ("adjacent_zone_id", &s.adjacent_zone_id, &index.zones),
            ("adjacent_surface_id", &s.adjacent_surface_id, &index.surfaces),
            ("adjacent_from", &s.adjacent_from, &index.surfaces),
        ] {
            if let Some(reference) = reference.as_ref().filter(|r| !valid.contains(*r)) {
                violations.push(Violation::Dangling {
                    surface_id: s.id.clone(),
                    field,
                    reference: reference.clone(),
                });
            }
        }

        if s.is_origin() && s.is_partner() {
            violations.push(Violation::DoubleRole {
                surface_id: s.id.clone(),
            });
        }
        if s.is_origin() != (s.boundary_condition == BoundaryCondition::Zone) {
            violations.push(Violation::BoundaryMismatch {
                surface_id: s.id.clone(),
            });
        }

        if let Some(target) = s.adjacent_surface_id.as_deref() {
            if let Some(t) = by_id.get(target) {
                if t.adjacent_from.as_deref() != Some(s.id.as_str()) || t.is_origin() {
                    violations.push(Violation::Asymmetric {
                        origin: s.id.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        if let Some(from) = s.adjacent_from.as_deref() {
            if let Some(o) = by_id.get(from) {
                if o.adjacent_surface_id.as_deref() != Some(s.id.as_str()) {
                    violations.push(Violation::OrphanPartner {
                        partner: s.id.clone(),
                        from: from.to_string(),
                    });
                }
            }
        }
    }

    violations.extend(
        find_duplicate_ids(floors, &[])
            .into_iter()
            .map(|id| Violation::DuplicateId { id }),
    );
    violations
}

/// Floor, zone and surface ids that occur more than once across both trees.
#[must_use]
pub fn find_duplicate_ids(before: &[Floor], after: &[Floor]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for floor in before.iter().chain(after) {
        let zone_ids = floor.zones.iter().map(|z| z.id.as_str());
        let surface_ids = floor
            .zones
            .iter()
            .flat_map(|z| z.surfaces.iter().map(|s| s.id.as_str()));
        for id in std::iter::once(floor.floor_id.as_str())
            .chain(zone_ids)
            .chain(surface_ids)
        {
            if !seen.insert(id) && !duplicates.iter().any(|d: &String| d == id) {
                duplicates.push(id.to_string());
            }
        }
    }
    duplicates
}

/// Logs the outcome of [`find_duplicate_ids`] and reports whether the trees are clean.
pub fn validate_unique_ids(before: &[Floor], after: &[Floor]) -> bool {
    let duplicates = find_duplicate_ids(before, after);
    if duplicates.is_empty() {
        info!("no duplicate ids across versions");
        true
    } else {
        warn!(?duplicates, "duplicate ids across versions");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::set_adjacency;
    use crate::model::{SurfaceType, Zone};
    use pretty_assertions::assert_eq;

    fn floors() -> Vec<Floor> {
        vec![Floor::new("f1", "1층", 1).with_zones(vec![
            Zone::new("z1", "존 1")
                .with_surfaces(vec![Surface::new("a", "벽 1", SurfaceType::Wall)]),
            Zone::new("z2", "존 2")
                .with_surfaces(vec![Surface::new("b", "벽 1", SurfaceType::Wall)]),
        ])]
    }

    #[test]
    fn linked_tree_is_clean() {
        let mut floors = floors();
        set_adjacency(&mut floors, "a", "b", "z2").unwrap();
        assert_eq!(check_tree(&floors), vec![]);
    }

    #[test]
    fn one_sided_link_is_reported() {
        let mut floors = floors();
        let a = &mut floors[0].zones[0].surfaces[0];
        a.adjacent_surface_id = Some("b".into());
        a.boundary_condition = BoundaryCondition::Zone;

        assert_eq!(
            check_tree(&floors),
            vec![Violation::Asymmetric {
                origin: "a".into(),
                target: "b".into()
            }]
        );
    }

    #[test]
    fn duplicates_across_versions_are_found_once() {
        let before = floors();
        let after = floors();
        let duplicates = find_duplicate_ids(&before, &after);

        assert_eq!(duplicates, vec!["f1", "z1", "z2", "a", "b"]);
        assert!(!validate_unique_ids(&before, &after));
        assert!(validate_unique_ids(&before, &[]));
    }
}
