use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use std::path::PathBuf;
use std::process::ExitCode;

use remodel_shape::adjacency::{
    change_boundary_condition, check_tree, eligible_targets, link_surfaces, remove_adjacency,
    sanitize, would_destroy_link,
};
use remodel_shape::config::ResizeLimits;
use remodel_shape::document::load_document;
use remodel_shape::error::{EditError, OperationReport};
use remodel_shape::export::{export_adjacency_csv, export_json};
use remodel_shape::merge::merge_selection;
use remodel_shape::model::{BoundaryCondition, Document, Floor, NanoIds, SurfaceType, Version};
use remodel_shape::propagate::{apply_copy, CopyRequest, CopySource};
use remodel_shape::removal::{remove_floor, remove_surface, remove_zone};
use remodel_shape::resize::{set_floor_count, set_surface_count, set_zone_count, FloorSide};
use remodel_shape::{logging, selection::SelectionState};

#[derive(Parser, Debug)]
#[command(name = "remodel-shape")]
#[command(about = "Remodel Shape - edit floors, zones and surfaces without breaking adjacency")]
#[command(version)]
struct Args {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct DocumentArgs {
    /// Path to the before/after shape document (JSON)
    file: PathBuf,

    /// Where to write the edited document (defaults to FILE)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List adjacency invariant violations in both versions
    Check {
        /// Path to the before/after shape document (JSON)
        file: PathBuf,
    },
    /// Null every adjacency reference to a missing id
    Sanitize {
        #[command(flatten)]
        doc: DocumentArgs,
    },
    /// Set the number of floors above or below ground
    ResizeFloors {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(long, value_enum, default_value = "above")]
        side: SideArg,
        #[arg(long, allow_negative_numbers = true)]
        count: i64,
    },
    /// Set the number of zones on a floor
    ResizeZones {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(long)]
        floor: String,
        #[arg(long, allow_negative_numbers = true)]
        count: i64,
    },
    /// Set the number of surfaces of one type in a zone
    ResizeSurfaces {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(long)]
        zone: String,
        #[arg(long = "type", value_enum)]
        surface_type: SurfaceTypeArg,
        #[arg(long, allow_negative_numbers = true)]
        count: i64,
    },
    /// Link two surfaces; ORIGIN becomes the side that owns the link
    Link {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(long)]
        origin: String,
        /// Target surface; omit to list the eligible ones
        #[arg(long)]
        target: Option<String>,
    },
    /// Release every link a surface takes part in
    Unlink {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(long)]
        surface: String,
    },
    /// Change a surface's boundary condition
    Boundary {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(long)]
        surface: String,
        #[arg(long, value_enum)]
        condition: BoundaryArg,
        /// Confirm dropping a live link
        #[arg(long)]
        yes: bool,
    },
    /// Remove one floor, zone or surface
    Remove {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[command(flatten)]
        entity: EntityArgs,
    },
    /// Copy a whole version, or overwrite targets with a floor, zone or surface
    Copy {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Version the source is taken from
        #[arg(long, value_enum)]
        base: Option<VersionArg>,
        #[command(flatten)]
        source: SourceArgs,
        /// Destination ids (floor, zone or surface copies)
        #[arg(long = "target", value_name = "ID")]
        targets: Vec<String>,
        /// Version replaced by a whole-version copy
        #[arg(long, value_enum)]
        target_version: Option<VersionArg>,
    },
    /// Merge the selection described by a JSON file into a version
    Merge {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Selection sets as JSON: {"floors": [...], "zones": [...], "surfaces": [...],
        /// "photovoltaic_systems": [...]}
        #[arg(long, value_name = "FILE")]
        selection: PathBuf,
        #[arg(long, value_enum)]
        from: VersionArg,
        #[arg(long, value_enum)]
        into: VersionArg,
    },
    /// Write the adjacency table of one version as CSV
    ExportCsv {
        /// Path to the before/after shape document (JSON)
        file: PathBuf,
        #[arg(long, value_enum)]
        version: VersionArg,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct EntityArgs {
    #[arg(long)]
    floor: Option<String>,
    #[arg(long)]
    zone: Option<String>,
    #[arg(long)]
    surface: Option<String>,
}

#[derive(ClapArgs, Debug)]
#[group(multiple = false)]
struct SourceArgs {
    /// Floor to copy; with no source the whole version is copied
    #[arg(long = "floor")]
    floor: Option<String>,
    #[arg(long = "zone")]
    zone: Option<String>,
    #[arg(long = "surface")]
    surface: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> CopySource {
        match (self.floor, self.zone, self.surface) {
            (Some(id), _, _) => CopySource::Floor(id),
            (_, Some(id), _) => CopySource::Zone(id),
            (_, _, Some(id)) => CopySource::Surface(id),
            _ => CopySource::Version,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VersionArg {
    Before,
    After,
}

impl From<VersionArg> for Version {
    fn from(v: VersionArg) -> Self {
        match v {
            VersionArg::Before => Self::Before,
            VersionArg::After => Self::After,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SideArg {
    Above,
    Below,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SurfaceTypeArg {
    Floor,
    Ceiling,
    Wall,
}

impl From<SurfaceTypeArg> for SurfaceType {
    fn from(t: SurfaceTypeArg) -> Self {
        match t {
            SurfaceTypeArg::Floor => Self::Floor,
            SurfaceTypeArg::Ceiling => Self::Ceiling,
            SurfaceTypeArg::Wall => Self::Wall,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BoundaryArg {
    Outdoors,
    Ground,
    Zone,
    Adiabatic,
    #[value(name = "none")]
    Unset,
}

impl From<BoundaryArg> for BoundaryCondition {
    fn from(b: BoundaryArg) -> Self {
        match b {
            BoundaryArg::Outdoors => Self::Outdoors,
            BoundaryArg::Ground => Self::Ground,
            BoundaryArg::Zone => Self::Zone,
            BoundaryArg::Adiabatic => Self::Adiabatic,
            BoundaryArg::Unset => Self::Unset,
        }
    }
}

/// Writes `next` when the edit succeeded and prints the report either way.
fn commit(
    doc: &DocumentArgs,
    result: Result<Document, EditError>,
    success: &str,
) -> Result<ExitCode> {
    let report = OperationReport::from_result(&result, success);
    let code = match result {
        Ok(next) => {
            let path = doc.output.as_ref().unwrap_or(&doc.file);
            export_json(&next, path)?;
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(code)
}

/// Runs `edit` on the floors of `version`.
fn edit_floors(
    document: &Document,
    version: VersionArg,
    edit: impl FnOnce(&[Floor]) -> Result<Vec<Floor>, EditError>,
) -> Result<Document, EditError> {
    let version = Version::from(version);
    let floors = edit(&document.building(version).shape_info)?;
    Ok(document.with_floors(version, floors))
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init(args.verbose);

    let limits = ResizeLimits::default();
    let mut ids = NanoIds;

    match args.command {
        Command::Check { file } => {
            let document = load_document(&file)?;
            let mut clean = true;
            for version in Version::ALL {
                for violation in check_tree(&document.building(version).shape_info) {
                    println!("{version}: {violation}");
                    clean = false;
                }
            }
            if clean {
                println!("No adjacency violations");
                return Ok(ExitCode::SUCCESS);
            }
            Ok(ExitCode::FAILURE)
        }
        Command::Sanitize { doc } => {
            let mut document = load_document(&doc.file)?;
            let nulled: usize = Version::ALL
                .iter()
                .map(|v| sanitize(&mut document.building_mut(*v).shape_info))
                .sum();
            commit(&doc, Ok(document), &format!("nulled {nulled} dangling references"))
        }
        Command::ResizeFloors {
            doc,
            version,
            side,
            count,
        } => {
            let document = load_document(&doc.file)?;
            let side = match side {
                SideArg::Above => FloorSide::Above,
                SideArg::Below => FloorSide::Below,
            };
            let result = edit_floors(&document, version, |floors| {
                Ok(set_floor_count(floors, side, count, &limits, &mut ids))
            });
            commit(&doc, result, "resized floors")
        }
        Command::ResizeZones {
            doc,
            version,
            floor,
            count,
        } => {
            let document = load_document(&doc.file)?;
            let result = edit_floors(&document, version, |floors| {
                set_zone_count(floors, &floor, count, &limits, &mut ids)
            });
            commit(&doc, result, "resized zones")
        }
        Command::ResizeSurfaces {
            doc,
            version,
            zone,
            surface_type,
            count,
        } => {
            let document = load_document(&doc.file)?;
            let result = edit_floors(&document, version, |floors| {
                set_surface_count(floors, &zone, surface_type.into(), count, &limits, &mut ids)
            });
            commit(&doc, result, "resized surfaces")
        }
        Command::Link {
            doc,
            version,
            origin,
            target,
        } => {
            let document = load_document(&doc.file)?;
            let Some(target) = target else {
                let floors = &document.building(version.into()).shape_info;
                for candidate in eligible_targets(floors, &origin) {
                    println!(
                        "{}\t{}\t{}",
                        candidate.floor_id, candidate.zone_id, candidate.surface_id
                    );
                }
                return Ok(ExitCode::SUCCESS);
            };
            let result = edit_floors(&document, version, |floors| {
                let mut next = floors.to_vec();
                link_surfaces(&mut next, &origin, &target)?;
                sanitize(&mut next);
                Ok(next)
            });
            commit(&doc, result, "linked surfaces")
        }
        Command::Unlink {
            doc,
            version,
            surface,
        } => {
            let document = load_document(&doc.file)?;
            let result = edit_floors(&document, version, |floors| {
                let mut next = floors.to_vec();
                remove_adjacency(&mut next, &surface)?;
                sanitize(&mut next);
                Ok(next)
            });
            commit(&doc, result, "unlinked surface")
        }
        Command::Boundary {
            doc,
            version,
            surface,
            condition,
            yes,
        } => {
            let document = load_document(&doc.file)?;
            let condition = BoundaryCondition::from(condition);
            let floors = &document.building(version.into()).shape_info;
            if !yes && would_destroy_link(floors, &surface, condition) {
                let report = OperationReport::error(format!(
                    "surface '{surface}' is linked; pass --yes to drop the link"
                ));
                println!("{}", serde_json::to_string(&report)?);
                return Ok(ExitCode::FAILURE);
            }
            let result = edit_floors(&document, version, |floors| {
                let mut next = floors.to_vec();
                change_boundary_condition(&mut next, &surface, condition)?;
                sanitize(&mut next);
                Ok(next)
            });
            commit(&doc, result, "changed boundary condition")
        }
        Command::Remove {
            doc,
            version,
            entity,
        } => {
            let document = load_document(&doc.file)?;
            let result = edit_floors(&document, version, |floors| {
                match (&entity.floor, &entity.zone, &entity.surface) {
                    (Some(id), _, _) => remove_floor(floors, id),
                    (_, Some(id), _) => remove_zone(floors, id),
                    (_, _, Some(id)) => remove_surface(floors, id),
                    _ => Err(EditError::NoTargetSelected),
                }
            });
            commit(&doc, result, "removed")
        }
        Command::Copy {
            doc,
            base,
            source,
            targets,
            target_version,
        } => {
            let document = load_document(&doc.file)?;
            let source = source.into_source();
            let success = source.success_message();
            let request = CopyRequest {
                base_version: base.map(Version::from),
                source: Some(source),
                target_version: target_version.map(Version::from),
                targets: targets.into_iter().collect(),
            };
            let result = apply_copy(&document, &request, &mut ids);
            commit(&doc, result, success)
        }
        Command::Merge {
            doc,
            selection,
            from,
            into,
        } => {
            let document = load_document(&doc.file)?;
            let selection: SelectionState =
                serde_json::from_str(&std::fs::read_to_string(&selection)?)?;
            let (from, into) = (Version::from(from), Version::from(into));
            let merged = merge_selection(
                &selection,
                document.building(from),
                document.building(into),
                &mut ids,
            );
            let mut next = document;
            *next.building_mut(into) = merged;
            commit(&doc, Ok(next), "merged selection")
        }
        Command::ExportCsv {
            file,
            version,
            output,
        } => {
            let document = load_document(&file)?;
            export_adjacency_csv(&document.building(version.into()).shape_info, &output)?;
            println!("Exported to CSV: {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
