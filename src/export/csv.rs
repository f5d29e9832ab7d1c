use crate::error::ExportError;
use crate::model::tree::{find_surface, find_zone};
use crate::model::{format_floor_number, BoundaryCondition, Floor};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 8] = [
    "Floor",
    "Zone",
    "Surface",
    "Type",
    "Boundary",
    "Adjacent Zone",
    "Adjacent Surface",
    "Adjacent From",
];

/// Writes one row per surface with its links resolved to names.
pub fn export_adjacency_csv<P: AsRef<Path>>(floors: &[Floor], path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    write_adjacency_csv(floors, file)
}

pub fn write_adjacency_csv<W: Write>(floors: &[Floor], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for floor in floors {
        let floor_label = format_floor_number(floor.floor_number);
        for zone in &floor.zones {
            for surface in &zone.surfaces {
                writer.write_record([
                    floor_label.as_str(),
                    zone.name.as_str(),
                    surface.name.as_str(),
                    surface.surface_type.label(),
                    boundary_label(surface.boundary_condition),
                    zone_name(floors, surface.adjacent_zone_id.as_deref()),
                    surface_name(floors, surface.adjacent_surface_id.as_deref()),
                    surface_name(floors, surface.adjacent_from.as_deref()),
                ])?;
            }
        }
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

// Unresolvable ids are written as they are.
fn zone_name<'a>(floors: &'a [Floor], id: Option<&'a str>) -> &'a str {
    id.map(|id| find_zone(floors, id).map_or(id, |(_, z)| z.name.as_str()))
        .unwrap_or_default()
}

fn surface_name<'a>(floors: &'a [Floor], id: Option<&'a str>) -> &'a str {
    id.map(|id| find_surface(floors, id).map_or(id, |(_, _, s)| s.name.as_str()))
        .unwrap_or_default()
}

fn boundary_label(condition: BoundaryCondition) -> &'static str {
    match condition {
        BoundaryCondition::Outdoors => "outdoors",
        BoundaryCondition::Ground => "ground",
        BoundaryCondition::Zone => "zone",
        BoundaryCondition::Adiabatic => "adiabatic",
        BoundaryCondition::Unset => "",
    }
}
