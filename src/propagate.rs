//! Copy/overwrite of a whole version, a floor, a zone or a surface onto
//! destinations in either version.
//!
//! One request runs as four passes over a scratch copy of the document:
//!
//! 1. release every surface that links into the region being replaced,
//! 2. detach the cloned template from links that leave it,
//! 3. clone the template into each destination under fresh ids, remapping
//!    links between cloned entities,
//! 4. sanitize both trees.
//!
//! Validation happens before the scratch copy is touched, so a refused
//! request never produces a partially written document.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::adjacency::{sanitize, validate_unique_ids};
use crate::error::{EditError, OperationReport};
use crate::model::tree::{find_floor, find_surface, find_zone, locate_surface, IdIndex};
use crate::model::{BoundaryCondition, Document, Floor, IdGenerator, Surface, Version, Zone};

pub const VERSION_COPIED: &str = "리모델링 데이터 복사가 완료되었습니다.";
pub const SHAPE_OVERWRITTEN: &str = "공간정보 덮어쓰기가 완료되었습니다.";

/// What is copied out of the base version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopySource {
    /// Every floor and photovoltaic system of the base version.
    Version,
    Floor(String),
    Zone(String),
    Surface(String),
}

impl CopySource {
    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::Version => VERSION_COPIED,
            _ => SHAPE_OVERWRITTEN,
        }
    }
}

/// A copy or overwrite as the caller assembled it. Unset fields are
/// reported as validation failures by [`apply_copy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyRequest {
    pub base_version: Option<Version>,
    pub source: Option<CopySource>,
    /// Version replaced by a [`CopySource::Version`] copy.
    pub target_version: Option<Version>,
    /// Destination ids of the same granularity as `source`, in either version.
    pub targets: BTreeSet<String>,
}

impl CopyRequest {
    #[must_use]
    pub fn version(base: Version, target: Version) -> Self {
        Self {
            base_version: Some(base),
            source: Some(CopySource::Version),
            target_version: Some(target),
            targets: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn overwrite<I, S>(base: Version, source: CopySource, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_version: Some(base),
            source: Some(source),
            target_version: None,
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Runs `request` against `document` and returns the next document.
pub fn apply_copy(
    document: &Document,
    request: &CopyRequest,
    ids: &mut impl IdGenerator,
) -> Result<Document, EditError> {
    let (Some(base_version), Some(source)) = (request.base_version, request.source.as_ref())
    else {
        return Err(EditError::NoBaseSelected);
    };
    if *source != CopySource::Version && request.targets.is_empty() {
        return Err(EditError::NoTargetSelected);
    }
    let base = document.building(base_version);
    let mut next = document.clone();

    match source {
        CopySource::Version => {
            let target = request
                .target_version
                .ok_or(EditError::TargetVersionUnspecified)?;
            let floors = clone_floors(&base.shape_info, ids);
            let building = next.building_mut(target);
            building.shape_info = floors;
            building.photovoltaic_systems = base.photovoltaic_systems.clone();
        }
        CopySource::Floor(id) => {
            let template = find_floor(&base.shape_info, id)
                .ok_or_else(|| EditError::UnknownFloor { id: id.clone() })?
                .clone();
            require_targets(document, request, |floors, id| find_floor(floors, id).is_some())
                .map_err(|id| EditError::UnknownFloor { id })?;
            for version in Version::ALL {
                overwrite_floors(
                    &mut next.building_mut(version).shape_info,
                    &template,
                    &request.targets,
                    ids,
                );
            }
        }
        CopySource::Zone(id) => {
            let (_, template) = find_zone(&base.shape_info, id)
                .ok_or_else(|| EditError::UnknownZone { id: id.clone() })?;
            let template = template.clone();
            require_targets(document, request, |floors, id| find_zone(floors, id).is_some())
                .map_err(|id| EditError::UnknownZone { id })?;
            for version in Version::ALL {
                overwrite_zones(
                    &mut next.building_mut(version).shape_info,
                    &template,
                    &request.targets,
                    ids,
                );
            }
        }
        CopySource::Surface(id) => {
            let (_, _, template) = find_surface(&base.shape_info, id)
                .ok_or_else(|| EditError::UnknownSurface { id: id.clone() })?;
            let template = template.clone();
            require_targets(document, request, |floors, id| {
                locate_surface(floors, id).is_some()
            })
            .map_err(|id| EditError::UnknownSurface { id })?;
            for version in Version::ALL {
                overwrite_surfaces(
                    &mut next.building_mut(version).shape_info,
                    &template,
                    &request.targets,
                    ids,
                );
            }
        }
    }

    for version in Version::ALL {
        sanitize(&mut next.building_mut(version).shape_info);
    }
    validate_unique_ids(&next.before.shape_info, &next.after.shape_info);

    info!(
        base = %base_version,
        ?source,
        targets = request.targets.len(),
        "copy applied"
    );
    Ok(next)
}

/// [`apply_copy`] folded into the structured result the presentation layer
/// shows. On failure the input document is returned untouched.
pub fn apply_copy_report(
    document: &Document,
    request: &CopyRequest,
    ids: &mut impl IdGenerator,
) -> (Document, OperationReport) {
    let success = request
        .source
        .as_ref()
        .map_or(SHAPE_OVERWRITTEN, CopySource::success_message);
    match apply_copy(document, request, ids) {
        Ok(next) => (next, OperationReport::success(success)),
        Err(e) => (document.clone(), OperationReport::from(&e)),
    }
}

/// Every target id must exist in one of the two versions.
fn require_targets(
    document: &Document,
    request: &CopyRequest,
    exists: impl Fn(&[Floor], &str) -> bool,
) -> Result<(), String> {
    for id in &request.targets {
        if !Version::ALL
            .iter()
            .any(|v| exists(&document.building(*v).shape_info, id))
        {
            return Err(id.clone());
        }
    }
    Ok(())
}

fn overwrite_floors(
    floors: &mut [Floor],
    template: &Floor,
    targets: &BTreeSet<String>,
    ids: &mut impl IdGenerator,
) {
    let mut region = IdIndex::default();
    for floor in floors.iter().filter(|f| targets.contains(&f.floor_id)) {
        for zone in &floor.zones {
            region.insert_zone(zone);
        }
    }
    release_region(floors, &region);

    for floor in floors.iter_mut().filter(|f| targets.contains(&f.floor_id)) {
        floor.zones = clone_zones(&template.zones, ids);
        floor.is_copied = template.is_copied;
    }
}

fn overwrite_zones(
    floors: &mut [Floor],
    template: &Zone,
    targets: &BTreeSet<String>,
    ids: &mut impl IdGenerator,
) {
    let mut region = IdIndex::default();
    for zone in floors
        .iter()
        .flat_map(|f| f.zones.iter())
        .filter(|z| targets.contains(&z.id))
    {
        region.insert_zone(zone);
    }
    release_region(floors, &region);

    for zone in floors
        .iter_mut()
        .flat_map(|f| f.zones.iter_mut())
        .filter(|z| targets.contains(&z.id))
    {
        let name = std::mem::take(&mut zone.name);
        let mut clones = clone_zones(std::slice::from_ref(template), ids);
        if let Some(mut clone) = clones.pop() {
            clone.name = name;
            *zone = clone;
        }
    }
}

fn overwrite_surfaces(
    floors: &mut [Floor],
    template: &Surface,
    targets: &BTreeSet<String>,
    ids: &mut impl IdGenerator,
) {
    let mut region = IdIndex::default();
    region.surfaces.extend(
        floors
            .iter()
            .flat_map(|f| f.zones.iter())
            .flat_map(|z| z.surfaces.iter())
            .filter(|s| targets.contains(&s.id))
            .map(|s| s.id.clone()),
    );
    release_region(floors, &region);

    for surface in floors
        .iter_mut()
        .flat_map(|f| f.zones.iter_mut())
        .flat_map(|z| z.surfaces.iter_mut())
        .filter(|s| targets.contains(&s.id))
    {
        let mut clone = template.clone();
        detach_external(&mut clone, &IdIndex::default());
        clone.id = ids.next_id();
        clone.is_generated = false;
        clone.name = std::mem::take(&mut surface.name);
        *surface = clone;
    }
}

/// Pass 1: frees the tree from links into `region` before it is replaced.
///
/// Generated surfaces that only stood in for a link from the region are
/// deleted; other surfaces outside the region that reference it are unlinked.
fn release_region(floors: &mut [Floor], region: &IdIndex) -> usize {
    let mut released = 0;
    let mut dropped = 0;
    for zone in floors.iter_mut().flat_map(|f| f.zones.iter_mut()) {
        let before = zone.surfaces.len();
        zone.surfaces.retain(|s| {
            region.surfaces.contains(&s.id)
                || !(s.is_generated && region.contains_surface(s.adjacent_from.as_deref()))
        });
        dropped += before - zone.surfaces.len();

        for s in &mut zone.surfaces {
            if region.surfaces.contains(&s.id) {
                continue;
            }
            if region.contains_surface(s.adjacent_surface_id.as_deref())
                || region.contains_surface(s.adjacent_from.as_deref())
                || region.contains_zone(s.adjacent_zone_id.as_deref())
            {
                s.unlink();
                released += 1;
            }
        }
    }
    debug!(released, dropped, "released links into replaced region");
    released
}

/// Pass 2: drops the surface links that leave the cloned template.
///
/// A zone reference alone is kept; if it points at nothing in the
/// destination tree, sanitizing clears it.
fn detach_external(s: &mut Surface, internal: &IdIndex) {
    if s.adjacent_surface_id.is_some()
        && !internal.contains_surface(s.adjacent_surface_id.as_deref())
    {
        s.adjacent_surface_id = None;
        s.adjacent_zone_id = None;
        if s.boundary_condition == BoundaryCondition::Zone {
            s.boundary_condition = BoundaryCondition::Unset;
        }
    }
    if s.adjacent_from.is_some() && !internal.contains_surface(s.adjacent_from.as_deref()) {
        s.adjacent_from = None;
        s.adjacent_zone_id = None;
    }
}

/// Old-to-new id assignments for one materialization.
#[derive(Debug, Default)]
struct IdMap {
    zones: HashMap<String, String>,
    surfaces: HashMap<String, String>,
}

impl IdMap {
    fn assign(&mut self, zone: &Zone, ids: &mut impl IdGenerator) {
        self.zones
            .entry(zone.id.clone())
            .or_insert_with(|| ids.next_id());
        for s in &zone.surfaces {
            self.surfaces
                .entry(s.id.clone())
                .or_insert_with(|| ids.next_id());
        }
    }

    /// Pass 3 for one zone: new ids, and links between cloned entities follow them.
    fn apply(&self, zone: &mut Zone) {
        if let Some(id) = self.zones.get(&zone.id) {
            zone.id.clone_from(id);
        }
        for s in &mut zone.surfaces {
            if let Some(id) = self.surfaces.get(&s.id) {
                s.id.clone_from(id);
            }
            remap(&mut s.adjacent_zone_id, &self.zones);
            remap(&mut s.adjacent_surface_id, &self.surfaces);
            remap(&mut s.adjacent_from, &self.surfaces);
        }
    }
}

fn remap(field: &mut Option<String>, map: &HashMap<String, String>) {
    if let Some(new) = field.as_ref().and_then(|old| map.get(old)) {
        *field = Some(new.clone());
    }
}

/// Clones `template` under fresh ids, keeping only links inside it.
pub(crate) fn clone_zones(template: &[Zone], ids: &mut impl IdGenerator) -> Vec<Zone> {
    let mut internal = IdIndex::default();
    for zone in template {
        internal.insert_zone(zone);
    }

    let mut zones = template.to_vec();
    for zone in &mut zones {
        zone.surfaces.retain(|s| {
            !(s.is_generated
                && s.adjacent_from.is_some()
                && !internal.contains_surface(s.adjacent_from.as_deref()))
        });
        for s in &mut zone.surfaces {
            detach_external(s, &internal);
        }
    }

    let mut map = IdMap::default();
    for zone in &zones {
        map.assign(zone, ids);
    }
    for zone in &mut zones {
        map.apply(zone);
    }
    debug!(
        zones = map.zones.len(),
        surfaces = map.surfaces.len(),
        "cloned zones under fresh ids"
    );
    zones
}

/// Whole-version clone: one id map shared by every floor, fresh floor ids.
fn clone_floors(template: &[Floor], ids: &mut impl IdGenerator) -> Vec<Floor> {
    let all: Vec<Zone> = template.iter().flat_map(|f| f.zones.iter().cloned()).collect();
    let mut cloned = clone_zones(&all, ids).into_iter();

    template
        .iter()
        .map(|floor| Floor {
            floor_id: ids.next_id(),
            zones: cloned.by_ref().take(floor.zones.len()).collect(),
            floor_name: floor.floor_name.clone(),
            floor_number: floor.floor_number,
            is_copied: floor.is_copied,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::{check_tree, find_duplicate_ids, remove_adjacency, set_adjacency};
    use crate::model::tree::{all_surface_ids, all_zone_ids};
    use crate::model::{Building, SequentialIds, SurfaceType};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn wall(id: &str) -> Surface {
        Surface::new(id, id, SurfaceType::Wall)
    }

    /// After: floor 1 with A (zone za) linked to B (zone zb).
    /// Before: floor 1 with C alone, and floor 2 with two linked walls.
    fn document() -> Document {
        let mut after = vec![Floor::new("fa1", "1층", 1).with_zones(vec![
            Zone::new("za", "존 1").with_surfaces(vec![wall("A")]),
            Zone::new("zb", "존 2").with_surfaces(vec![wall("B")]),
        ])];
        set_adjacency(&mut after, "A", "B", "zb").unwrap();

        let mut before = vec![
            Floor::new("fb2", "2층", 2).with_zones(vec![
                Zone::new("zx", "존 1").with_surfaces(vec![wall("X")]),
                Zone::new("zy", "존 2").with_surfaces(vec![wall("Y")]),
            ]),
            Floor::new("fb1", "1층", 1)
                .with_zones(vec![Zone::new("zc", "존 1").with_surfaces(vec![wall("C")])]),
        ];
        set_adjacency(&mut before, "X", "Y", "zy").unwrap();

        Document {
            before: Building::new(before),
            after: Building::new(after),
        }
    }

    #[test]
    fn overwriting_a_linked_surface_releases_both_sides() {
        let doc = document();
        let request =
            CopyRequest::overwrite(Version::Before, CopySource::Surface("C".into()), ["A"]);
        let next = apply_copy(&doc, &request, &mut SequentialIds::new("n")).unwrap();

        let zone_a = &next.after.shape_info[0].zones[0];
        let replaced = &zone_a.surfaces[0];
        assert_eq!(replaced.id, "n-1");
        assert_eq!(replaced.name, "A");
        assert!(!replaced.has_any_reference());

        let b = &next.after.shape_info[0].zones[1].surfaces[0];
        assert!(!b.has_any_reference());
        assert_eq!(b.boundary_condition, BoundaryCondition::Unset);
        assert_eq!(check_tree(&next.after.shape_info), vec![]);
    }

    #[test]
    fn stand_in_surface_copies_as_a_plain_surface() {
        let mut doc = document();
        doc.before.shape_info[0].zones[1].surfaces[0].is_generated = true;
        let request =
            CopyRequest::overwrite(Version::Before, CopySource::Surface("Y".into()), ["A"]);
        let mut next = apply_copy(&doc, &request, &mut SequentialIds::new("n")).unwrap();

        let replaced = next.after.shape_info[0].zones[0].surfaces[0].clone();
        assert_eq!(replaced.name, "A");
        assert!(!replaced.is_generated);
        assert!(!replaced.has_any_reference());

        // Releasing a link onto the copy must not delete it.
        set_adjacency(&mut next.after.shape_info, "B", &replaced.id, "za").unwrap();
        remove_adjacency(&mut next.after.shape_info, "B").unwrap();
        assert!(find_surface(&next.after.shape_info, &replaced.id).is_some());
        assert_eq!(check_tree(&next.after.shape_info), vec![]);
    }

    #[test]
    fn floor_overwrite_keeps_internal_links_per_target() {
        let mut doc = document();
        doc.after
            .shape_info
            .insert(0, Floor::new("fa2", "2층", 2).with_zones(vec![Zone::new("zq", "존 1")]));

        let source = CopySource::Floor("fb2".into());
        let request = CopyRequest::overwrite(Version::Before, source, ["fa1", "fa2"]);
        let next = apply_copy(&doc, &request, &mut SequentialIds::new("n")).unwrap();

        let after = &next.after.shape_info;
        assert_eq!(after[0].floor_id, "fa2");
        assert_eq!(after[1].floor_name, "1층");
        assert_eq!(after[1].floor_number, 1);

        for floor in after {
            let x = &floor.zones[0].surfaces[0];
            let y = &floor.zones[1].surfaces[0];
            assert_eq!(x.adjacent_surface_id.as_ref(), Some(&y.id));
            assert_eq!(x.adjacent_zone_id.as_ref(), Some(&floor.zones[1].id));
            assert_eq!(y.adjacent_from.as_ref(), Some(&x.id));
        }

        // Two targets, two zones and two surfaces each, all new.
        let old: HashSet<String> = all_zone_ids(&doc.before.shape_info)
            .into_iter()
            .chain(all_zone_ids(&doc.after.shape_info))
            .chain(all_surface_ids(&doc.before.shape_info))
            .chain(all_surface_ids(&doc.after.shape_info))
            .collect();
        let new: HashSet<String> = all_zone_ids(after)
            .into_iter()
            .chain(all_surface_ids(after))
            .collect();
        assert_eq!(new.len(), 8);
        assert!(new.is_disjoint(&old));
        assert_eq!(check_tree(after), vec![]);
        assert_eq!(find_duplicate_ids(&next.before.shape_info, after), Vec::<String>::new());
    }

    #[test]
    fn zone_overwrite_drops_links_leaving_the_template() {
        let doc = document();
        let request =
            CopyRequest::overwrite(Version::Before, CopySource::Zone("zx".into()), ["zb"]);
        let next = apply_copy(&doc, &request, &mut SequentialIds::new("n")).unwrap();

        let zone = &next.after.shape_info[0].zones[1];
        assert_eq!(zone.name, "존 2");
        assert_eq!(zone.id, "n-1");
        assert!(!zone.surfaces[0].has_any_reference());
        assert_eq!(zone.surfaces[0].boundary_condition, BoundaryCondition::Unset);

        let a = &next.after.shape_info[0].zones[0].surfaces[0];
        assert!(!a.has_any_reference());
        // The base tree is untouched.
        assert_eq!(next.before, doc.before);
    }

    #[test]
    fn version_copy_replaces_target_and_carries_pv() {
        let mut doc = document();
        doc.before
            .photovoltaic_systems
            .push(crate::model::PhotovoltaicSystem::new("pv_1", "PV 1"));

        let request = CopyRequest::version(Version::Before, Version::After);
        let (next, report) = apply_copy_report(&doc, &request, &mut SequentialIds::new("n"));

        assert_eq!(report, OperationReport::success(VERSION_COPIED));
        assert_eq!(next.after.photovoltaic_systems, doc.before.photovoltaic_systems);
        let after = &next.after.shape_info;
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].floor_number, 2);
        let x = &after[0].zones[0].surfaces[0];
        let y = &after[0].zones[1].surfaces[0];
        assert_eq!(x.adjacent_surface_id.as_ref(), Some(&y.id));
        assert_ne!(x.id, "X");
        assert_eq!(check_tree(after), vec![]);
        assert_eq!(find_duplicate_ids(&next.before.shape_info, after), Vec::<String>::new());
    }

    #[test]
    fn incomplete_requests_are_refused_without_changes() {
        let doc = document();
        let mut ids = SequentialIds::new("n");

        let err = apply_copy(&doc, &CopyRequest::default(), &mut ids).unwrap_err();
        assert_eq!(err, EditError::NoBaseSelected);

        let mut request = CopyRequest::version(Version::Before, Version::After);
        request.target_version = None;
        let (same, report) = apply_copy_report(&doc, &request, &mut ids);
        assert_eq!(same, doc);
        assert_eq!(report.message, "타겟 리모델링 타입을 선택해주세요.");

        let source = CopySource::Zone("zx".into());
        let request = CopyRequest::overwrite(Version::Before, source, Vec::<String>::new());
        assert_eq!(apply_copy(&doc, &request, &mut ids).unwrap_err(), EditError::NoTargetSelected);

        let request =
            CopyRequest::overwrite(Version::Before, CopySource::Zone("zx".into()), ["missing"]);
        assert!(apply_copy(&doc, &request, &mut ids)
            .unwrap_err()
            .is_contract_violation());
    }
}
