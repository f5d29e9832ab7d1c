use crate::error::EditError;
use crate::model::tree::find_surface;
use crate::model::{floor_above, floor_below, Floor, SurfaceType};

use super::link::set_adjacency;

/// A surface the origin may be linked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub floor_id: String,
    pub zone_id: String,
    pub surface_id: String,
}

/// Checks the structural linking rule between two surfaces.
///
/// Walls pair with walls of another zone on the same floor number, a floor
/// surface pairs with a ceiling one level down, a ceiling with a floor one
/// level up. Targets that already take part in a link are refused.
pub fn check_eligibility(
    floors: &[Floor],
    origin_id: &str,
    target_id: &str,
) -> Result<(), EditError> {
    if origin_id == target_id {
        return Err(EditError::SelfLink {
            id: origin_id.to_string(),
        });
    }
    let (origin_floor, origin_zone, origin) =
        find_surface(floors, origin_id).ok_or_else(|| EditError::UnknownSurface {
            id: origin_id.to_string(),
        })?;
    let (target_floor, target_zone, target) =
        find_surface(floors, target_id).ok_or_else(|| EditError::UnknownSurface {
            id: target_id.to_string(),
        })?;

    let refuse = |reason: &str| EditError::IneligibleLink {
        origin: origin_id.to_string(),
        target: target_id.to_string(),
        reason: reason.to_string(),
    };

    if target.has_adjacency() {
        return Err(refuse("target is already linked"));
    }

    let fits = match origin.surface_type {
        SurfaceType::Wall => {
            target.surface_type == SurfaceType::Wall
                && target_floor.floor_number == origin_floor.floor_number
                && target_zone.id != origin_zone.id
        }
        SurfaceType::Floor => {
            target.surface_type == SurfaceType::Ceiling
                && target_floor.floor_number == floor_below(origin_floor.floor_number)
        }
        SurfaceType::Ceiling => {
            target.surface_type == SurfaceType::Floor
                && target_floor.floor_number == floor_above(origin_floor.floor_number)
        }
    };
    if fits {
        Ok(())
    } else {
        Err(refuse(rule_for(origin.surface_type)))
    }
}

fn rule_for(surface_type: SurfaceType) -> &'static str {
    match surface_type {
        SurfaceType::Wall => "walls link only to walls of another zone on the same floor",
        SurfaceType::Floor => "floors link only to ceilings on the level below",
        SurfaceType::Ceiling => "ceilings link only to floors on the level above",
    }
}

#[must_use]
pub fn is_eligible(floors: &[Floor], origin_id: &str, target_id: &str) -> bool {
    check_eligibility(floors, origin_id, target_id).is_ok()
}

/// Every surface `origin_id` may currently be linked to, in tree order.
#[must_use]
pub fn eligible_targets(floors: &[Floor], origin_id: &str) -> Vec<LinkCandidate> {
    let mut candidates = Vec::new();
    for floor in floors {
        for zone in &floor.zones {
            for surface in &zone.surfaces {
                if is_eligible(floors, origin_id, &surface.id) {
                    candidates.push(LinkCandidate {
                        floor_id: floor.floor_id.clone(),
                        zone_id: zone.id.clone(),
                        surface_id: surface.id.clone(),
                    });
                }
            }
        }
    }
    candidates
}

/// Validates the pair, then links it with [`set_adjacency`].
pub fn link_surfaces(
    floors: &mut [Floor],
    origin_id: &str,
    target_id: &str,
) -> Result<(), EditError> {
    check_eligibility(floors, origin_id, target_id)?;
    let target_zone_id = find_surface(floors, target_id)
        .map(|(_, zone, _)| zone.id.clone())
        .ok_or_else(|| EditError::UnknownSurface {
            id: target_id.to_string(),
        })?;
    set_adjacency(floors, origin_id, target_id, &target_zone_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Surface, Zone};
    use pretty_assertions::assert_eq;

    fn zone(id: &str, surfaces: &[(&str, SurfaceType)]) -> Zone {
        Zone::new(id, id).with_surfaces(
            surfaces
                .iter()
                .map(|(sid, t)| Surface::new(*sid, *sid, *t))
                .collect(),
        )
    }

    fn building() -> Vec<Floor> {
        use SurfaceType::{Ceiling, Floor as Slab, Wall};
        vec![
            Floor::new("f1", "1층", 1).with_zones(vec![
                zone("z1a", &[("1a-floor", Slab), ("1a-ceil", Ceiling), ("1a-wall", Wall)]),
                zone("z1b", &[("1b-floor", Slab), ("1b-ceil", Ceiling), ("1b-wall", Wall)]),
            ]),
            Floor::new("fb1", "B1층", -1).with_zones(vec![zone(
                "zb1",
                &[("b1-floor", Slab), ("b1-ceil", Ceiling), ("b1-wall", Wall)],
            )]),
        ]
    }

    #[test]
    fn wall_links_to_wall_of_other_zone_on_same_floor() {
        let floors = building();
        let ids: Vec<String> = eligible_targets(&floors, "1a-wall")
            .into_iter()
            .map(|c| c.surface_id)
            .collect();
        assert_eq!(ids, vec!["1b-wall".to_string()]);
    }

    #[test]
    fn floor_links_across_missing_level_zero() {
        let floors = building();
        assert!(is_eligible(&floors, "1a-floor", "b1-ceil"));
        assert!(!is_eligible(&floors, "1a-floor", "1b-ceil"));
        assert!(is_eligible(&floors, "b1-ceil", "1b-floor"));
    }

    #[test]
    fn linked_targets_are_not_offered() {
        let mut floors = building();
        link_surfaces(&mut floors, "1b-wall", "1a-wall").unwrap();

        assert!(eligible_targets(&floors, "1a-wall").is_empty());
        let err = link_surfaces(&mut floors, "1a-wall", "1b-wall").unwrap_err();
        assert!(matches!(err, EditError::IneligibleLink { .. }));
    }

    #[test]
    fn type_mismatch_is_a_validation_failure() {
        let mut floors = building();
        let err = link_surfaces(&mut floors, "1a-wall", "1b-floor").unwrap_err();
        assert!(!err.is_contract_violation());
        assert!(err.to_string().contains("walls link only"));
    }
}
